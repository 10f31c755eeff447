use snap_editor_lib::command::execute_json_batch;
use snap_editor_lib::state::settings::EditorSettings;
use snap_editor_lib::Editor;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "snap_editor=info".into()),
        )
        .init();

    let mut editor = Editor::new(EditorSettings::load());

    if let Some(scene_json) = read_arg_file("--scene") {
        if let Err(e) = editor.load_scene_json(&scene_json) {
            tracing::error!("Failed to load scene: {e}");
            std::process::exit(1);
        }
        tracing::info!("Loaded scene ({} blocks)", editor.scene.block_count());
    }

    let Some(script) = read_arg_file("--script") else {
        tracing::info!("No --script given; printing the current scene");
        println!("{}", editor.scene.export_json());
        return;
    };

    match execute_json_batch(&mut editor, &script) {
        Ok(responses) => {
            for response in responses {
                match serde_json::to_string(&response) {
                    Ok(line) => println!("{line}"),
                    Err(e) => tracing::error!("Failed to serialize response: {e}"),
                }
            }
        }
        Err(e) => {
            tracing::error!("{e}");
            std::process::exit(1);
        }
    }
}

/// Read the file named by `<flag> <path>`
fn read_arg_file(flag: &str) -> Option<String> {
    let args: Vec<String> = std::env::args().collect();
    let mut i = 1;
    while i < args.len() {
        if args[i] == flag && i + 1 < args.len() {
            let path = &args[i + 1];
            match std::fs::read_to_string(path) {
                Ok(contents) => return Some(contents),
                Err(e) => {
                    tracing::error!("Failed to read {path}: {e}");
                    std::process::exit(1);
                }
            }
        }
        i += 1;
    }
    None
}
