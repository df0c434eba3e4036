use std::env;

fn main() {
    // Only the board binary links against ESP-IDF; host builds (tests, docs)
    // have no sysenv to forward.
    if env::var_os("CARGO_FEATURE_ESP32").is_some() {
        embuild::espidf::sysenv::output();
    }

    println!("cargo:rerun-if-changed=build.rs");
}
