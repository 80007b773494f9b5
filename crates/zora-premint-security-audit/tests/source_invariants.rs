//! Source invariant tests for the zora-premint SDK.
//!
//! These scan the production sources on every `cargo test --workspace` run so
//! that a change which weakens signature handling or version dispatch fails CI.

use regex::Regex;
use std::path::Path;
use walkdir::WalkDir;

/// A source file of the SDK with its `#[cfg(test)]` module cut off.
struct SourceFile {
    path: String,
    production: String,
}

impl SourceFile {
    fn is_bin(&self) -> bool {
        Path::new(&self.path)
            .components()
            .any(|c| c.as_os_str() == "bin")
    }

    fn file_name(&self) -> &str {
        Path::new(&self.path)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("")
    }
}

/// Every .rs file under `zora-premint/src`, binaries included.
fn sdk_sources() -> Vec<SourceFile> {
    let src = Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .join("zora-premint")
        .join("src");

    let mut files: Vec<SourceFile> = WalkDir::new(&src)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().and_then(|x| x.to_str()) == Some("rs"))
        .filter_map(|e| {
            let content = std::fs::read_to_string(e.path()).ok()?;
            Some(SourceFile {
                path: e.path().display().to_string(),
                production: strip_test_module(&content),
            })
        })
        .collect();

    assert!(!files.is_empty(), "no sources found under {}", src.display());
    files.sort_by(|a, b| a.path.cmp(&b.path));
    files
}

/// Library sources only; binaries may panic on bad operator input.
fn library_sources() -> Vec<SourceFile> {
    sdk_sources().into_iter().filter(|f| !f.is_bin()).collect()
}

/// Unit tests sit at the end of each module, so everything from the first
/// `#[cfg(test)]` on is test code.
fn strip_test_module(content: &str) -> String {
    match content.find("#[cfg(test)]") {
        Some(i) => content[..i].to_string(),
        None => content.to_string(),
    }
}

/// Body of `fn name` up to the next top-level item.
fn function_body<'a>(content: &'a str, name: &str) -> Option<&'a str> {
    let start = content.find(&format!("fn {name}"))?;
    let body = &content[start..];
    let end = body[1..]
        .find("\npub fn ")
        .or_else(|| body[1..].find("\npub async fn "))
        .or_else(|| body[1..].find("\nfn "))
        .map(|i| i + 1)
        .unwrap_or(body.len());
    Some(&body[..end])
}

#[test]
fn no_hardcoded_private_keys_in_production_code() {
    let hex_64_re = Regex::new(r"0x[a-fA-F0-9]{64}").unwrap();
    let allowed_patterns = ["SECP256K1_N_DIV_2"];

    for file in &sdk_sources() {
        let (path, prod_content) = (&file.path, &file.production);

        for mat in hex_64_re.find_iter(&prod_content) {
            let line_num = prod_content[..mat.start()].lines().count() + 1;
            let line = prod_content.lines().nth(line_num - 1).unwrap_or("");

            let context_start = mat.start().saturating_sub(200);
            let context_end = (mat.end() + 200).min(prod_content.len());
            let context = &prod_content[context_start..context_end];

            let is_allowed = allowed_patterns.iter().any(|p| context.contains(p));

            assert!(
                is_allowed,
                "Potential hardcoded secret found at {}:{}: {}",
                path,
                line_num,
                line.trim()
            );
        }
    }
}

#[test]
fn version_dispatch_is_exhaustive() {
    let dispatch_files = [
        "types.rs",
        "eip712.rs",
        "recover.rs",
        "executor.rs",
        "authorization.rs",
    ];
    let wildcard_re = Regex::new(r"(^|[\s(])_\s*=>").unwrap();

    for file in &library_sources() {
        if !dispatch_files.contains(&file.file_name()) {
            continue;
        }

        let (path, prod_content) = (&file.path, &file.production);
        for (i, line) in prod_content.lines().enumerate() {
            assert!(
                !wildcard_re.is_match(line),
                "Wildcard match arm at {}:{}: {}. Premint versions must be matched \
                 exhaustively so a new version cannot fall into an existing branch.",
                path,
                i + 1,
                line.trim()
            );
        }
    }
}

#[test]
fn library_code_does_not_panic_on_input() {
    let panic_re = Regex::new(r"\.unwrap\(\)|\.expect\(|panic!\(").unwrap();

    for file in &library_sources() {
        let (path, prod_content) = (&file.path, &file.production);
        for (i, line) in prod_content.lines().enumerate() {
            if line.trim_start().starts_with("//") {
                continue;
            }
            assert!(
                !panic_re.is_match(line),
                "Panicking call in library code at {}:{}: {}. Return a PremintError instead.",
                path,
                i + 1,
                line.trim()
            );
        }
    }
}

#[test]
fn signatures_are_parsed_before_recovery() {
    for file in &library_sources() {
        if file.file_name() != "recover.rs" {
            continue;
        }

        let (path, prod_content) = (&file.path, &file.production);
        let parse = function_body(&prod_content, "parse_signature")
            .unwrap_or_else(|| panic!("parse_signature missing from {path}"));
        assert!(
            parse.contains("!= 65"),
            "parse_signature at {} must reject signatures that are not 65 bytes",
            path
        );
        assert!(
            parse.contains("SECP256K1_N_DIV_2"),
            "parse_signature at {} must reject high-s signatures",
            path
        );

        let recover = function_body(&prod_content, "recover_signer_from_digest")
            .unwrap_or_else(|| panic!("recover_signer_from_digest missing from {path}"));
        assert!(
            recover.contains("parse_signature("),
            "recover_signer_from_digest at {} must go through parse_signature",
            path
        );
    }
}

#[test]
fn malformed_signatures_rejected_before_network_calls() {
    for file in &library_sources() {
        if file.file_name() != "authorization.rs" {
            continue;
        }

        let (path, prod_content) = (&file.path, &file.production);
        let body = function_body(&prod_content, "is_valid_signature")
            .unwrap_or_else(|| panic!("is_valid_signature missing from {path}"));

        let parse = body.find("parse_signature(");
        let network = body.find(".get_contract_address(");
        assert!(
            matches!((parse, network), (Some(p), Some(n)) if p < n),
            "is_valid_signature at {} must parse the signature before calling the executor",
            path
        );
    }
}

#[test]
fn mint_costs_never_wrap() {
    for file in &library_sources() {
        if !matches!(file.file_name(), "mint.rs" | "executor.rs") {
            continue;
        }

        let (path, prod_content) = (&file.path, &file.production);
        for pattern in ["wrapping_", "overflowing_", "saturating_mul", "saturating_add"] {
            assert!(
                !prod_content.contains(pattern),
                "{} uses {}. Mint costs must be exact or fail with CostOverflow.",
                path,
                pattern
            );
        }
    }
}
