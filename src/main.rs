fn main() {
    deadzone::game::run();
}
