use std::env;

fn main() {
    // Tell Cargo to rerun if the linker script changes
    println!("cargo:rerun-if-changed=linker.ld");

    // Only the bare-metal image needs our memory layout; host builds link normally.
    if env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("none") {
        let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap_or_default();
        println!("cargo:rustc-link-arg-bins=-T{}/linker.ld", manifest_dir);
    }
}
