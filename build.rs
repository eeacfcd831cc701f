use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

fn main() {
    // Templates are compiled into the binary by askama.
    watch_templates(Path::new("templates"));

    // Logged once at startup by the server binary.
    let stamp = match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(elapsed) => elapsed.as_secs().to_string(),
        Err(_) => String::from("dev"),
    };
    println!("cargo:rustc-env=CLUB_PORTAL_BUILD_ID={stamp}");
}

fn watch_templates(dir: &Path) {
    let Ok(entries) = dir.read_dir() else {
        return;
    };
    for path in entries.filter_map(Result::ok).map(|e| e.path()) {
        if path.is_dir() {
            watch_templates(&path);
        } else if path.extension().is_some_and(|ext| ext == "html") {
            println!("cargo:rerun-if-changed={}", path.display());
        }
    }
}
