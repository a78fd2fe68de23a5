use std::{env, fs, path::PathBuf};

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=OUT_DIR");

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let completions_dir = out_dir.join("completions");

    fs::create_dir_all(&completions_dir).unwrap();

    let mut cmd = clap::Command::new("rendergap")
        .version(env!("CARGO_PKG_VERSION"))
        .author("rendergap contributors")
        .about("Measure how much page content is visible without JavaScript")
        .arg(clap::arg!(<INITIAL> "Initial (raw) page: URL, local file, or '-' for stdin"))
        .arg(clap::arg!(<FINAL> "Rendered page: URL, local file, or '-' for stdin"))
        .arg(
            clap::arg!(-o --output <FILE> "Output file (default: stdout)")
                .value_name("FILE")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(
            clap::arg!(-f --format <FORMAT> "Output format (text, json, diff)")
                .value_name("FORMAT")
                .default_value("text")
                .value_parser(["text", "json", "diff"]),
        )
        .arg(
            clap::arg!(-m --mode <MODE> "Diff granularity (word, line)")
                .value_name("MODE")
                .default_value("word")
                .value_parser(["word", "line"]),
        )
        .arg(clap::arg!(--plain "Inputs are plain text; skip HTML filtering"))
        .arg(clap::arg!(--"ignore-nav-footer" "Drop navigation, header, footer and aside regions before comparing"))
        .arg(clap::arg!(--"both-scenarios" "Report results with and without navigation/footer regions"))
        .arg(clap::arg!(--pretty "Pretty-print JSON output"))
        .arg(clap::arg!(--breakdown "Show the weighted inputs of the visibility score (text only)"))
        .arg(clap::arg!(--width <COLS> "Wrap recommendation text at this width (0 = no wrapping)").default_value("0"))
        .arg(clap::arg!(--timeout <SECS> "HTTP timeout in seconds").default_value("30"))
        .arg(clap::arg!(--"user-agent" <UA> "Custom User-Agent for HTTP requests").value_name("UA"))
        .arg(clap::arg!(--"fail-under" <SCORE> "Exit with status 2 if the visibility score is below SCORE"))
        .arg(clap::arg!(-v --verbose "Enable debug logging"));

    clap_complete::generate_to(clap_complete::shells::Bash, &mut cmd, "rendergap", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Zsh, &mut cmd, "rendergap", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Fish, &mut cmd, "rendergap", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::PowerShell, &mut cmd, "rendergap", &completions_dir).unwrap();

    println!(
        "cargo:warning=Shell completions generated in: {}",
        completions_dir.display()
    );
}
