//! Host-side helper: `cargo run` builds the wasm bundle into `static/pkg`
//! and serves `static/` on port 8000.

use std::process::{Command, ExitCode, Stdio};
use std::{env, thread, time::Duration};

const PORT: &str = "8000";

fn main() -> ExitCode {
    // Only meaningful on non-wasm targets.
    if env::var("TARGET").unwrap_or_default() == "wasm32-unknown-unknown" {
        return ExitCode::SUCCESS;
    }

    println!("Building WASM pkg …");
    match Command::new("wasm-pack")
        .args(["build", "--release", "--target", "web", "--out-dir", "static/pkg"])
        .env("HOLO_FX_SKIP_PACK", "1")
        .status()
    {
        Ok(st) if st.success() => {}
        Ok(_) => {
            eprintln!("wasm-pack finished with errors. Ensure wasm-pack is installed (https://rustwasm.github.io/wasm-pack/).");
            return ExitCode::FAILURE;
        }
        Err(_) => {
            eprintln!("wasm-pack not found in PATH. Skipping wasm build; the site may serve stale artifacts.");
        }
    }

    println!("Launching local server at http://127.0.0.1:{PORT} …");
    let server = Command::new("python3")
        .args(["-m", "http.server", PORT, "--directory", "static"])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn();
    let mut server = match server {
        Ok(child) => child,
        Err(e) => {
            eprintln!("failed to start http server: {e}");
            return ExitCode::FAILURE;
        }
    };

    loop {
        if let Ok(Some(status)) = server.try_wait() {
            eprintln!("http server exited: {status}");
            return ExitCode::FAILURE;
        }
        thread::sleep(Duration::from_secs(5));
    }
}
