//! decb-cli — split a DECB machine-language binary into per-section artifacts.
//!
//! Each section's raw bytes land in `<stem>_<addr>.bin` next to the input
//! file, where `<addr>` is the load address as four lowercase hex digits.

use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use decb_core::container::program::Program;
use decb_core::container::section::SectionInfo;
use decb_core::container::sink::SectionSink;
use decb_core::error::SinkError;

#[derive(Parser, Debug)]
#[command(version, about = "TRS-80 Color Computer DECB binary splitter")]
struct Args {
    /// DECB machine-language file (as saved by SAVEM)
    input: PathBuf,
}

/// Writes each sealed section to its own `.bin` artifact and prints a
/// progress block, mirroring the decoder's discovery order.
struct FileSink {
    dir: PathBuf,
    stem: String,
}

impl FileSink {
    fn for_input(input: &Path) -> Self {
        let dir = input.parent().unwrap_or(Path::new("")).to_path_buf();
        // Strip the last extension only: "game.tape.bin" -> "game.tape".
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "out".to_owned());
        Self { dir, stem }
    }

    fn artifact_path(&self, load_address: u16) -> PathBuf {
        self.dir
            .join(artifact_name(&self.stem, load_address))
    }
}

fn artifact_name(stem: &str, load_address: u16) -> String {
    format!("{stem}_{load_address:04x}.bin")
}

impl SectionSink for FileSink {
    fn on_section_start(&mut self, section: &SectionInfo) {
        println!("Section: {}", section.index);
        println!(
            "Address: 0x{:04x} ({})",
            section.load_address, section.load_address
        );
        println!("Length: {} bytes", section.length);
        println!("------------------------");
    }

    fn on_section(&mut self, section: &SectionInfo, bytes: &[u8]) -> Result<(), SinkError> {
        let path = self.artifact_path(section.load_address);
        std::fs::write(&path, bytes)
            .map_err(|e| SinkError::new(format!("cannot write {}: {e}", path.display())))?;

        println!("Output: {}", path.display());
        Ok(())
    }
}

fn main() {
    // clap exits with code 2 on usage errors; this tool's contract is 1 for
    // every failure. Help and version output keep exit code 0.
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            process::exit(code);
        }
    };

    let bytes = match std::fs::read(&args.input) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("error: cannot read {}: {e}", args.input.display());
            process::exit(1);
        }
    };

    let mut sink = FileSink::for_input(&args.input);
    match Program::decode(&bytes, &mut sink) {
        Ok(program) => {
            for warning in &program.warnings {
                eprintln!("warning: {warning}");
            }
            println!(
                "Execution address: 0x{:04x} ({})",
                program.exec_address, program.exec_address
            );
            println!("Total sections: {}", program.sections.len());
        }
        Err(failure) => {
            for warning in &failure.warnings {
                eprintln!("warning: {warning}");
            }
            eprintln!("error: {}", failure.error);
            if !failure.sections.is_empty() {
                eprintln!(
                    "note: {} section(s) extracted before the error",
                    failure.sections.len()
                );
            }
            process::exit(1);
        }
    }
}
