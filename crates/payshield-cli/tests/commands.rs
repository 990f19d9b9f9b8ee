//! CLI commands against an in-process stub HSM

use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};

use clap::Parser;
use payshield::{CipherContext, KeyMaterial, to_hex};
use payshield_cli::{Cli, CliError, ErrorCategory, Outcome, OutputFormat, output, run};
use pretty_assertions::assert_eq;

/// Answer each connection with a structured reply carrying `payload`.
fn serve(payloads: Vec<Vec<u8>>) -> (u16, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let handle = thread::spawn(move || {
        for payload in payloads {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = [0u8; 1024];
            let _ = stream.read(&mut buf).unwrap();
            let mut reply = vec![b'0'; 26];
            reply.push(payload.len() as u8);
            reply.extend_from_slice(&payload);
            stream.write_all(&reply).unwrap();
        }
    });
    (port, handle)
}

fn parse(port: u16, args: &[&str]) -> Cli {
    let port = port.to_string();
    let mut argv = vec![
        "payshield",
        "--host",
        "127.0.0.1",
        "--port",
        port.as_str(),
        "--dpk",
        "S1009621AN00S0001",
        "--timeout-ms",
        "5000",
    ];
    argv.extend_from_slice(args);
    Cli::try_parse_from(argv).unwrap()
}

#[test]
fn test_encrypt_key() {
    let (port, server) = serve(vec![vec![0xC3; 16]]);
    let cli = parse(port, &["encrypt-key", &"00".repeat(16)]);

    let report = run(&cli).unwrap();
    assert_eq!(report.operation, "encrypt-key");
    assert_eq!(
        report.outcome,
        Outcome::Ok {
            value: "C3".repeat(16)
        }
    );
    assert_eq!(
        report.endpoint.as_deref(),
        Some(format!("tcp://127.0.0.1:{port}").as_str())
    );
    server.join().unwrap();
}

#[test]
fn test_decrypt_data_with_mask() {
    let data_key = [0x11; 16];
    let ciphertext = CipherContext::new(&KeyMaterial::from(data_key))
        .encrypt_str("4111111111111111")
        .unwrap();
    let (port, server) = serve(vec![data_key.to_vec()]);
    let cli = parse(
        port,
        &[
            "decrypt-data",
            "ABCDEF",
            &to_hex(&ciphertext),
            "--mask",
            "%%%%%%******%%%%",
        ],
    );

    let report = run(&cli).unwrap();
    assert_eq!(
        output::render(OutputFormat::Human, &report).unwrap(),
        "411111******1111"
    );
    server.join().unwrap();
}

#[test]
fn test_check_unreachable_is_not_an_error() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let report = run(&parse(port, &["check"])).unwrap();
    assert_eq!(report.outcome, Outcome::Availability { available: false });
}

#[test]
fn test_bad_port_is_a_user_error() {
    let cli = Cli::try_parse_from([
        "payshield",
        "--host",
        "127.0.0.1",
        "--port",
        "70000",
        "--dpk",
        "S1009621AN00S0001",
        "check",
    ])
    .unwrap();

    let err = run(&cli).unwrap_err();
    assert!(matches!(err, CliError::Hsm(_)));
    assert_eq!(err.category(), ErrorCategory::User);
}

#[test]
fn test_translate_without_legacy_settings() {
    let cli = parse(1, &["translate", "ABCD"]);
    let err = run(&cli).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Config);
}
