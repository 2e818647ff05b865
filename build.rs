fn main() {
    // Emits the ESP-IDF environment for downstream tooling. On host builds
    // (tests, CI) this prints nothing and is harmless.
    embuild::espidf::sysenv::output();
}
