fn main() -> Result<(), Box<dyn std::error::Error>> {
    if std::env::var_os("PROTOC").is_none() {
        std::env::set_var("PROTOC", protoc_bin_vendored::protoc_bin_path()?);
    }
    tonic_build::configure()
        .build_server(true)
        .build_client(true)
        .compile_protos(
            &["proto/billing.proto", "proto/patient_event.proto"],
            &["proto"],
        )?;

    println!("cargo:rerun-if-changed=proto/billing.proto");
    println!("cargo:rerun-if-changed=proto/patient_event.proto");
    Ok(())
}
