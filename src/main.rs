fn main() {
    meowpm::run_cli();
}
