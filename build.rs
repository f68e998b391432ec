fn main() {
    // ESP-IDF link-time environment is only relevant when the espidf
    // feature is enabled; host builds (lib + tests) skip it entirely.
    if std::env::var_os("CARGO_FEATURE_ESPIDF").is_some() {
        embuild::espidf::sysenv::output();
    }
}
