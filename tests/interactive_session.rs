use std::fs;

use serde_json::Value;

use qrcraft::repl::{self, ReplOptions};
use qrcraft::{DirectoryTarget, QrGenerator};

async fn run_script(script: &str, options: ReplOptions, dir_name: &str) -> (String, QrGenerator) {
    let dir = std::env::temp_dir().join(format!("qrcraft-{dir_name}-{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    let target = DirectoryTarget::new(&dir);

    let mut generator = QrGenerator::default();
    let mut out = Vec::new();
    repl::run(&mut generator, &target, script.as_bytes(), &mut out, options)
        .await
        .expect("session runs");

    let _ = fs::remove_dir_all(&dir);
    (String::from_utf8(out).expect("utf8 output"), generator)
}

#[tokio::test]
async fn text_session_walks_through_the_widget() {
    let script = "type example.com\ngenerate\ncolor #1e40af\ndownload\nreset\n";
    let (output, generator) = run_script(script, ReplOptions::default(), "repl-text").await;

    assert!(output.contains("Website URL: example.com ✓"), "{output}");
    assert!(output.contains("Generated QR code for https://example.com"));
    assert!(output.contains("QR Color: #1E40AF"));
    assert!(output.contains("premium-qr.png"));
    assert!(output.ends_with("Your premium QR preview will appear here\n"));

    let view = generator.view();
    assert_eq!(view.input, "");
    assert_eq!(view.color, "#020617");
}

#[tokio::test]
async fn errors_are_reported_and_session_continues() {
    let script = "type not a url\ngenerate\ndownload\nlaunch\nquit\ntype example.com\n";
    let (output, generator) = run_script(script, ReplOptions::default(), "repl-errors").await;

    assert!(output.contains("Please enter a valid website URL"));
    assert!(output.contains("Enter a valid website URL first"));
    assert!(output.contains("Error: Nothing to export"));
    assert!(output.contains("Error: Unknown command 'launch'"));

    // `quit` stops before the last line is applied.
    assert_eq!(generator.view().input, "not a url");
}

#[tokio::test]
async fn json_session_emits_one_document_per_action() {
    let options = ReplOptions {
        json: true,
        verify: true,
    };
    let script = "url google.com\ngenerate\nshow\n";
    let (output, _) = run_script(script, options, "repl-json").await;

    let docs: Vec<Value> = output
        .lines()
        .map(|line| serde_json::from_str(line).expect("json line"))
        .collect();
    assert_eq!(docs.len(), 3);

    assert_eq!(docs[0]["outcome"]["outcome"], "updated");
    assert_eq!(docs[0]["view"]["indicator"], "valid");
    assert_eq!(docs[1]["outcome"]["url"], "https://google.com");
    assert_eq!(docs[1]["view"]["phase"], "generated");
    assert_eq!(docs[2]["outcome"], Value::Null);
    assert_eq!(docs[2]["view"]["download_visible"], true);
}

#[tokio::test]
async fn preview_requires_a_generated_code() {
    let script = "preview\ntype example.com\ngenerate\npreview\n";
    let (output, _) = run_script(script, ReplOptions::default(), "repl-preview").await;

    assert!(output.starts_with("Error: Nothing to export"));
    assert!(output.contains('▀') || output.contains('▄') || output.contains('█'));
}
