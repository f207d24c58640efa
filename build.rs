fn main() {
    // ESP-IDF link arguments are only needed for flash builds.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
