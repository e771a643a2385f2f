fn main() {
    // `core::config::ENDPOINT` is read with `option_env!`
    println!("cargo:rerun-if-env-changed=WSCHAT_ENDPOINT");
}
