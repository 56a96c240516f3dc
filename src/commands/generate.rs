//! Generate static files

use anyhow::Result;
use notify_debouncer_mini::new_debouncer;
use notify_debouncer_mini::notify::{RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::mpsc::channel;
use std::time::{Duration, Instant};

use crate::generator::Generator;
use crate::Blog;

/// Generate the static site
pub fn run(blog: &Blog) -> Result<()> {
    let start = Instant::now();

    let generator = Generator::new(blog)?;
    let count = generator.generate()?;

    let duration = start.elapsed();
    tracing::info!("Generated {} posts in {:.2}s", count, duration.as_secs_f64());

    Ok(())
}

/// Watch the sources and regenerate on every change.
///
/// Blocks until the watcher shuts down.
pub fn watch(blog: &Blog) -> Result<()> {
    let (tx, rx) = channel();

    // Debounce to avoid multiple rapid rebuilds
    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;

    let mut watched = watch_targets(blog);
    for (path, mode) in &watched {
        debouncer.watcher().watch(path, *mode)?;
        tracing::debug!("Watching: {:?}", path);
    }

    tracing::info!("Watching for changes. Press Ctrl+C to stop.");

    for result in rx {
        match result {
            Ok(events) => {
                let relevant: Vec<_> = events.iter().filter(|e| !is_ignored(&e.path)).collect();
                if relevant.is_empty() {
                    continue;
                }

                for event in &relevant {
                    tracing::info!("File changed: {}", event.path.display());
                }

                // Reload so edits to _config.yml take effect
                let current = match Blog::new(&blog.base_dir) {
                    Ok(current) => current,
                    Err(e) => {
                        tracing::error!("Failed to reload config: {:#}", e);
                        continue;
                    }
                };

                let targets = watch_targets(&current);
                if targets != watched {
                    rewatch(debouncer.watcher(), &watched, &targets);
                    watched = targets;
                }

                if let Err(e) = run(&current) {
                    tracing::error!("Generation failed: {:#}", e);
                }
            }
            Err(e) => {
                tracing::error!("Watch error: {:?}", e);
            }
        }
    }

    Ok(())
}

/// Existing paths whose changes trigger a rebuild
fn watch_targets(blog: &Blog) -> Vec<(PathBuf, RecursiveMode)> {
    [
        (blog.posts_dir.clone(), RecursiveMode::Recursive),
        (blog.static_dir.clone(), RecursiveMode::Recursive),
        (blog.config_path(), RecursiveMode::NonRecursive),
    ]
    .into_iter()
    .filter(|(path, _)| path.exists())
    .collect()
}

/// Move the watches from `old` to `new` after a config change
fn rewatch(
    watcher: &mut dyn Watcher,
    old: &[(PathBuf, RecursiveMode)],
    new: &[(PathBuf, RecursiveMode)],
) {
    for (path, _) in old.iter().filter(|t| !new.contains(t)) {
        if let Err(e) = watcher.unwatch(path) {
            tracing::debug!("Failed to unwatch {:?}: {}", path, e);
        }
    }
    for (path, mode) in new.iter().filter(|t| !old.contains(t)) {
        match watcher.watch(path, *mode) {
            Ok(()) => tracing::info!("Now watching: {:?}", path),
            Err(e) => tracing::warn!("Failed to watch {:?}: {}", path, e),
        }
    }
}

/// Editor and VCS noise that should not trigger a rebuild
fn is_ignored(path: &Path) -> bool {
    let in_git = path.components().any(|c| c.as_os_str() == ".git");
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();

    in_git || name == ".DS_Store" || name.ends_with('~') || name.ends_with(".swp")
}
