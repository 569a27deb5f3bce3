//! XDG autostart entry that launches the clock hidden at login.

use log::info;
use std::fs;
use std::path::Path;

use crate::config::APP_DISPLAY_NAME;
use crate::error::AppResult;

pub fn desktop_entry(exe: &Path) -> String {
    format!(
        "[Desktop Entry]\n\
         Name={}\n\
         Comment=An alarm clock in your system tray\n\
         Icon=alarm-clock\n\
         Exec=\"{}\" hidden\n\
         Terminal=false\n\
         Type=Application\n\
         Categories=\n",
        APP_DISPLAY_NAME,
        exe.display()
    )
}

/// Enabled when the entry exists and nothing in it turns it off.
pub fn is_enabled(path: &Path) -> bool {
    let Ok(content) = fs::read_to_string(path) else {
        return false;
    };
    !content.lines().map(str::trim).any(|line| {
        line.eq_ignore_ascii_case("Hidden=true")
            || line.eq_ignore_ascii_case("X-GNOME-Autostart-enabled=false")
    })
}

pub fn set_enabled(path: &Path, exe: &Path, enabled: bool) -> AppResult<()> {
    if enabled {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(path, desktop_entry(exe))?;
        info!("Autostart enabled at {:?}", path);
    } else if path.exists() {
        fs::remove_file(path)?;
        info!("Autostart disabled");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_enable_then_disable() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("autostart").join("alarm-clock.desktop");
        let exe = Path::new("/usr/bin/alarm-clock");

        assert!(!is_enabled(&path));
        set_enabled(&path, exe, true).unwrap();
        assert!(is_enabled(&path));
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("Exec=\"/usr/bin/alarm-clock\" hidden"));
        assert!(content.contains("Name=Alarm Clock"));

        set_enabled(&path, exe, false).unwrap();
        assert!(!path.exists());
        // Disabling twice is fine
        set_enabled(&path, exe, false).unwrap();
    }

    #[test]
    fn test_entry_switched_off_by_desktop() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("alarm-clock.desktop");
        fs::write(&path, "[Desktop Entry]\nHidden=true\n").unwrap();
        assert!(!is_enabled(&path));
        fs::write(&path, "[Desktop Entry]\nX-GNOME-Autostart-enabled=false\n").unwrap();
        assert!(!is_enabled(&path));
        fs::write(&path, "[Desktop Entry]\nX-GNOME-Autostart-enabled=true\n").unwrap();
        assert!(is_enabled(&path));
    }
}
