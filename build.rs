use clap::CommandFactory;
use clap_complete::{Generator, Shell};
use clap_mangen::Man;
use std::path::{Path, PathBuf};

// Include the CLI definition from the library crate
include!("src/cli/app.rs");

const BIN_NAME: &str = "rbcmd";

fn render_man(cmd: clap::Command, path: &Path) {
    let mut buf = Vec::new();
    Man::new(cmd).render(&mut buf).unwrap();
    std::fs::write(path, buf).unwrap();
}

fn main() {
    println!("cargo:rerun-if-changed=src/cli/app.rs");

    if std::env::var("CARGO_CFG_TARGET_ARCH").unwrap_or_default() == "wasm32" {
        return;
    }

    let out_dir =
        PathBuf::from(std::env::var("OUT_DIR").unwrap_or_else(|_| "target/man".to_string()));

    // rbcmd.1 plus one page per subcommand (rbcmd-parse.1, rbcmd-scan.1, ...)
    let man_dir = out_dir.join("man");
    std::fs::create_dir_all(&man_dir).unwrap();
    let cmd = Cli::command();
    render_man(cmd.clone(), &man_dir.join(format!("{}.1", BIN_NAME)));
    for sub in cmd.get_subcommands() {
        let page = man_dir.join(format!("{}-{}.1", BIN_NAME, sub.get_name()));
        render_man(sub.clone(), &page);
    }

    let completions_dir = out_dir.join("completions");
    std::fs::create_dir_all(&completions_dir).unwrap();
    for shell in [Shell::Bash, Shell::Zsh, Shell::Fish, Shell::PowerShell] {
        let mut buf = Vec::new();
        clap_complete::generate(shell, &mut Cli::command(), BIN_NAME, &mut buf);
        std::fs::write(completions_dir.join(shell.file_name(BIN_NAME)), buf).unwrap();
    }
}
