// Variantmap Integration Tests
//
// Full pipeline over real files: mapping tables -> reader -> generator -> output

use std::fs;
use std::path::{Path, PathBuf};

use variantmap_core::{
    map_variants, run_job, Config, GenerateError, GenerationRequest, LineError, MapError,
    TableError, TokenError, Want,
};

fn write_table(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("failed to write mapping table");
    path
}

fn generate(files: &[PathBuf], want: Want, number: Option<u32>) -> Result<String, MapError> {
    let mut out = Vec::new();
    map_variants(&mut out, files, GenerationRequest::new(want, number), true)?;
    Ok(String::from_utf8(out).expect("output is UTF-8"))
}

#[test]
fn fixed_layout_example() {
    let dir = tempfile::tempdir().unwrap();
    let table = write_table(dir.path(), "layouts.lst", "us fr\nde jp(106) // kana\n");

    let output = generate(&[table], Want::Mls, None).unwrap();
    assert_eq!(
        output,
        "! model\t\tlayout\t\t\t\t=\tsymbols\n\
         \x20 *\t\tus\t\t\t=\tpc+fr\n\
         \x20 *\t\tde\t\t\t=\tpc+jp(106)\n"
    );
}

#[test]
fn layout_indexed_example() {
    let dir = tempfile::tempdir().unwrap();
    let table = write_table(dir.path(), "layouts.lst", "us fr\nde jp(106)\n");

    let output = generate(&[table], Want::Mls, Some(2)).unwrap();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[1], "  *\t\tus\t\t=\t+fr%(v[2]):2");
    assert_eq!(lines[2], "  *\t\tde\t\t=\t+jp(106):2");
}

#[test]
fn layout_only_rules_reject_source_variant() {
    let dir = tempfile::tempdir().unwrap();
    let table = write_table(dir.path(), "layouts.lst", "us fr\nde(nodeadkeys)\tjp// kana\n");

    for number in [None, Some(2)] {
        let result = generate(&[table.clone()], Want::Mls, number);
        assert!(
            matches!(
                result,
                Err(MapError::Generate(GenerateError::UnexpectedVariant(ref token)))
                    if token == "de(nodeadkeys)"
            ),
            "number {:?}: got {:?}",
            number,
            result
        );
    }
}

#[test]
fn zero_index_matches_no_index() {
    let dir = tempfile::tempdir().unwrap();
    let layouts = write_table(dir.path(), "layouts.lst", "us fr\nde jp(106)\nca jp\n");
    let variants = write_table(dir.path(), "variants.lst", "ch fr fr mac\nde(mac) de\n");

    // header plus one line per pair
    for (table, want, lines) in [(layouts, Want::Mls, 4), (variants, Want::Mlvs, 3)] {
        let files = [table];
        let unindexed = generate(&files, want, None).unwrap();
        assert_eq!(unindexed.lines().count(), lines);
        assert_eq!(generate(&files, want, Some(0)).unwrap(), unindexed);
    }
}

#[test]
fn compact_token_in_four_field_line_is_malformed() {
    let dir = tempfile::tempdir().unwrap();
    let table = write_table(dir.path(), "variants.lst", "ch(fr) mac fr mac\n");

    let result = generate(&[table], Want::Mlvs, None);
    match result {
        Err(MapError::Table(TableError::MalformedLine {
            line_number,
            reason: LineError::Token(TokenError::ConflictingVariant { token, variant }),
            ..
        })) => {
            assert_eq!(line_number, 1);
            assert_eq!(token, "ch(fr)");
            assert_eq!(variant, "mac");
        }
        other => panic!("expected malformed line, got {:?}", other),
    }
}

#[test]
fn header_appears_once_across_tables() {
    let dir = tempfile::tempdir().unwrap();
    let files = vec![
        write_table(dir.path(), "a.lst", "// first table\nch fr fr mac\n"),
        write_table(dir.path(), "b.lst", "de(mac) de\n"),
        write_table(dir.path(), "c.lst", "be oss fr oss\n"),
    ];

    let output = generate(&files, Want::Mlvs, Some(1)).unwrap();
    assert_eq!(
        output,
        "! model\t\tlayout[1]\tvariant[1]\t=\tsymbols\n\
         \x20 *\t\tch\t\tfr\t=\tpc+fr(mac)\n\
         \x20 *\t\tde\t\tmac\t=\tpc+de%(v[1])\n\
         \x20 *\t\tbe\t\toss\t=\tpc+fr(oss)\n"
    );
}

#[test]
fn variant_generator_rejects_plain_source() {
    let dir = tempfile::tempdir().unwrap();
    let table = write_table(dir.path(), "mixed.lst", "ch fr fr mac\nus fr\n");

    let mut out = Vec::new();
    let result = map_variants(
        &mut out,
        &[table],
        GenerationRequest::new(Want::Mlvs, None),
        true,
    );
    assert!(matches!(
        result,
        Err(MapError::Generate(GenerateError::MissingVariant(ref token))) if token == "us"
    ));

    // The pair before the failure was already written, nothing for "us"
    let output = String::from_utf8(out).unwrap();
    assert_eq!(output.lines().count(), 2);
    assert!(!output.contains("\tus\t"));
}

#[test]
fn malformed_line_aborts_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let good = write_table(dir.path(), "good.lst", "us fr\n");
    let bad = write_table(dir.path(), "bad.lst", "us fr\nde nodeadkeys jp\n");
    let never = write_table(dir.path(), "never.lst", "ca fr\n");

    let mut out = Vec::new();
    let result = map_variants(
        &mut out,
        &[good, bad, never],
        GenerationRequest::new(Want::Mls, None),
        true,
    );

    match result {
        Err(MapError::Table(TableError::MalformedLine {
            line_number,
            line,
            reason,
            ..
        })) => {
            assert_eq!(line_number, 2);
            assert_eq!(line, "de nodeadkeys jp");
            assert_eq!(reason, LineError::FieldCount(3));
        }
        other => panic!("expected malformed line, got {:?}", other),
    }

    let output = String::from_utf8(out).unwrap();
    assert!(!output.contains("ca"));
}

#[test]
fn manifest_jobs_run_relative_to_manifest() {
    let dir = tempfile::tempdir().unwrap();
    write_table(dir.path(), "layouts.lst", "us fr\n");
    write_table(dir.path(), "variants.lst", "ch fr fr mac\n");
    let manifest = write_table(
        dir.path(),
        "jobs.toml",
        r#"
[[job]]
want = "mls"
number = 3
dest = "mln_s.part"
files = ["layouts.lst"]

[[job]]
want = "mlvs"
dest = "mlv_s.part"
files = ["variants.lst"]
header = false
"#,
    );

    let config = Config::from_toml_path(&manifest).unwrap();
    for job in &config.jobs {
        run_job(job).unwrap();
    }

    assert_eq!(
        fs::read_to_string(dir.path().join("mln_s.part")).unwrap(),
        "! model\t\tlayout[3]\t=\tsymbols\n  *\t\tus\t\t=\t+fr%(v[3]):3\n"
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("mlv_s.part")).unwrap(),
        "  *\t\tch\t\tfr\t\t=\tpc+fr(mac)\n"
    );
}
