fn main() {
    subgate::run();
}
