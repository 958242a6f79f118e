fn main() {
    multiqueue::app::startup::startup();
}
