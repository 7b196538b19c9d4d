#[macro_use]
extern crate clap;

use std::env;
use std::fs;
use std::process;

use clap::Shell;

#[allow(dead_code)]
#[path = "src/app.rs"]
mod app;

fn main() {
    // OUT_DIR is set by Cargo and it's where any additional build artifacts
    // are written.
    let outdir = match env::var_os("OUT_DIR") {
        Some(outdir) => outdir,
        None => {
            eprintln!(
                "OUT_DIR environment variable not defined. \
                 Please file a bug: \
                 https://github.com/BurntSushi/ttyprobe/issues/new");
            process::exit(1);
        }
    };
    if let Err(err) = fs::create_dir_all(&outdir) {
        eprintln!("failed to create {:?}: {}", outdir, err);
        process::exit(1);
    }

    let mut app = app::app();
    app.gen_completions("ttyprobe", Shell::Bash, &outdir);
    app.gen_completions("ttyprobe", Shell::Fish, &outdir);
    app.gen_completions("ttyprobe", Shell::PowerShell, &outdir);
}
