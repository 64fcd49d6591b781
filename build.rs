fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    #[cfg(feature = "bin")]
    {
        let build_date = chrono::Utc::now().format("%Y-%m-%d");
        println!(
            "cargo:rustc-env=FULL_VERSION={}_{}",
            env!("CARGO_PKG_VERSION"),
            build_date
        );
    }
    #[cfg(not(feature = "bin"))]
    println!("cargo:rustc-env=FULL_VERSION={}", env!("CARGO_PKG_VERSION"));
}
