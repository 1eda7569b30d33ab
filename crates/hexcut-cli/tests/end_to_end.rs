//! # End-to-end runs
//!
//! Drives [`hexcut_cli::run`] with real files in a temporary directory and
//! checks the cut files, the aggregate file and the bank listing together.

use std::path::{Path, PathBuf};

use clap::Parser;
use hexcut_cli::{exit_code_for, run, Cli};
use hexcut_core::RunReport;

/// Source image plus an empty output folder.
struct Workspace {
    _dir: tempfile::TempDir,
    source: PathBuf,
    output: PathBuf,
}

impl Workspace {
    fn new(image: &[u8]) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("image.bin");
        std::fs::write(&source, image).unwrap();
        let output = dir.path().join("out");
        std::fs::create_dir(&output).unwrap();
        Self {
            _dir: dir,
            source,
            output,
        }
    }

    fn read(&self, name: &str) -> String {
        std::fs::read_to_string(self.output.join(name)).unwrap()
    }

    fn files(&self) -> usize {
        std::fs::read_dir(&self.output).unwrap().count()
    }

    fn run(&self, settings: &[&str]) -> anyhow::Result<(RunReport, String)> {
        let source = self.source.display().to_string();
        let output = self.output.display().to_string();
        let mut args = vec!["hexcut", source.as_str(), output.as_str()];
        args.extend_from_slice(settings);
        let cli = Cli::try_parse_from(args)?;
        let mut listing = Vec::new();
        let report = run(cli, &mut listing)?;
        Ok((report, String::from_utf8(listing)?))
    }
}

fn hex_of_reversed(bytes: &[u8]) -> String {
    bytes.iter().rev().map(|b| format!("{b:02x}")).collect()
}

#[test]
fn two_by_two_lsb_round_trip() {
    let image: Vec<u8> = (0u8..32).map(|b| b.wrapping_mul(7)).collect();
    let ws = Workspace::new(&image);

    let (report, listing) = ws.run(&["2-2", "DD", "8", "1", "@", "0"]).unwrap();

    assert_eq!(report.lines_per_bank, vec![1, 1, 1, 1]);
    assert_eq!(ws.files(), 5);
    assert_eq!(ws.read("cut000.hex"), format!("{}\n", hex_of_reversed(&image[0..8])));
    assert_eq!(ws.read("cut003.hex"), format!("{}\n", hex_of_reversed(&image[24..32])));
    // Line 1 lands in bank 2 and line 2 in bank 1.
    assert_eq!(ws.read("cut002.hex"), format!("{}\n", hex_of_reversed(&image[8..16])));
    assert_eq!(ws.read("cut001.hex"), format!("{}\n", hex_of_reversed(&image[16..24])));

    let main: Vec<String> = ws.read("main.hex").lines().map(str::to_string).collect();
    let expected: Vec<String> = image.chunks(8).map(hex_of_reversed).collect();
    assert_eq!(main, expected);

    let lines: Vec<&str> = listing.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], ws.output.join("cut000.hex").display().to_string());
    assert_eq!(lines[3], ws.output.join("cut003.hex").display().to_string());
}

#[test]
fn ecc_prefixes_every_line() {
    let mut image = vec![0u8; 16];
    image[0] = 1;
    let ws = Workspace::new(&image);

    ws.run(&["2", "D", "8", "1", "%", "1"]).unwrap();

    assert_eq!(ws.read("cut000.hex"), "b00000000000000001\n");
    assert_eq!(ws.read("cut001.hex"), "000000000000000000\n");
    assert_eq!(
        ws.read("main.hex"),
        "b00000000000000001\n000000000000000000\n"
    );
}

#[test]
fn ecc_with_wrong_width_fails_before_writing() {
    let ws = Workspace::new(&[0u8; 8]);
    let err = ws.run(&["2", "D", "4", "1", "@", "1"]).unwrap_err();
    assert_eq!(exit_code_for(&err), 1);
    assert!(format!("{err:#}").contains("ECC"));
    assert_eq!(ws.files(), 0);
}

#[test]
fn short_source_leaves_later_banks_empty() {
    // 4 banks of 4 rows, MSB placement: bank n holds lines 4n..4n+3.
    let ws = Workspace::new(&[0x11u8; 4 * 6 + 2]);

    let (report, listing) = ws.run(&["4", "@", "4", "4", "%", "0"]).unwrap();

    assert_eq!(report.lines_written, 7);
    assert_eq!(report.lines_per_bank, vec![4, 3, 0, 0]);
    assert_eq!(report.padding_bytes, 2);
    assert_eq!(ws.read("cut001.hex").lines().last(), Some("00001111"));
    for empty in ["cut002.hex", "cut003.hex"] {
        assert_eq!(std::fs::metadata(ws.output.join(empty)).unwrap().len(), 0);
    }
    assert_eq!(listing, "0\n1\n2\n3\n");
}

#[test]
fn banks_sum_to_source_lines() {
    let ws = Workspace::new(&[0xa5u8; 2 * 37]);
    let (report, _) = ws.run(&["2-4-2", "@D@", "2", "4", "%.%.%", "0"]).unwrap();
    assert_eq!(report.lines_per_bank.iter().sum::<u64>(), 37);
    assert_eq!(ws.read("main.hex").lines().count(), 37);

    let total: usize = (0..16)
        .map(|id| ws.read(&format!("cut{id:03}.hex")).lines().count())
        .sum();
    assert_eq!(total, 37);
}

#[test]
fn template_lists_coordinates_outermost_first() {
    let ws = Workspace::new(&[0u8; 8]);
    let (_, listing) = ws.run(&["2-4", "@@", "1", "1", "x=% y=%", "0"]).unwrap();
    let lines: Vec<&str> = listing.lines().collect();
    assert_eq!(lines.len(), 8);
    assert_eq!(lines[0], "x=0 y=0");
    assert_eq!(lines[1], "x=0 y=1");
    assert_eq!(lines[2], "x=1 y=0");
    assert_eq!(lines[7], "x=3 y=1");
}

#[test]
fn too_many_placeholders_fails_without_output() {
    let ws = Workspace::new(&[0u8; 16]);
    let err = ws.run(&["2", "@", "8", "1", "@ %-%", "0"]).unwrap_err();
    assert_eq!(exit_code_for(&err), 1);
    assert_eq!(ws.files(), 0);
}

#[test]
fn oversized_source_fails_without_output() {
    let ws = Workspace::new(&[0u8; 17]);
    let err = ws.run(&["2", "D", "8", "1", "@", "0"]).unwrap_err();
    assert_eq!(exit_code_for(&err), 1);
    assert!(format!("{err:#}").contains("too big"));
    assert_eq!(ws.files(), 0);
}

#[test]
fn non_power_of_two_shape_is_rejected() {
    let ws = Workspace::new(&[0u8; 8]);
    let err = ws.run(&["3", "D", "8", "1", "@", "0"]).unwrap_err();
    assert_eq!(exit_code_for(&err), 1);
    assert!(format!("{err:#}").contains("not a power of two"));
}

#[test]
fn missing_source_is_a_resource_error() {
    let ws = Workspace::new(&[]);
    std::fs::remove_file(&ws.source).unwrap();
    let err = ws.run(&["2", "D", "8", "1", "@", "0"]).unwrap_err();
    assert_eq!(exit_code_for(&err), 1);
    assert!(format!("{err:#}").contains("file not found"));
}

#[test]
fn job_file_and_json_report() {
    let ws = Workspace::new(&(0u8..24).collect::<Vec<_>>());
    let job = ws.output.parent().unwrap().join("job.yaml");
    let report_path = ws.output.parent().unwrap().join("report.json");
    std::fs::write(
        &job,
        format!(
            "source: {}\noutput: {}\nshape: 2-2\nmode: \"@D\"\nwidth: 4\nheight: 2\ntemplate: \"% %\"\n",
            ws.source.display(),
            ws.output.display()
        ),
    )
    .unwrap();

    let job_arg = path_str(&job);
    let report_arg = path_str(&report_path);
    let cli = Cli::try_parse_from([
        "hexcut",
        "--job",
        job_arg.as_str(),
        "--report",
        report_arg.as_str(),
    ])
    .unwrap();
    let mut listing = Vec::new();
    let report = run(cli, &mut listing).unwrap();

    assert_eq!(report.lines_written, 6);
    assert_eq!(String::from_utf8(listing).unwrap(), "0 0\n0 1\n1 0\n1 1\n");

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(json["lines_written"], 6);
    assert_eq!(json["capacity_lines"], 8);
    assert_eq!(json["lines_per_bank"].as_array().unwrap().len(), 4);
}

fn path_str(path: &Path) -> String {
    path.display().to_string()
}
