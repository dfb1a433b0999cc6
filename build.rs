fn main() {
    // Only the ESP-IDF build needs the toolchain environment; host builds
    // run the simulator and skip embuild entirely.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
