use std::process::Command;

/// Whether the desktop environment is set to a dark color scheme.
///
/// Falls back to dark when the setting cannot be read.
pub fn is_dark_mode() -> bool {
    query_dark_mode().unwrap_or(true)
}

#[cfg(target_os = "macos")]
fn query_dark_mode() -> Option<bool> {
    // Key is absent in light mode.
    let out = Command::new("defaults")
        .args(["read", "-g", "AppleInterfaceStyle"])
        .output()
        .ok()?;
    Some(
        String::from_utf8_lossy(&out.stdout)
            .trim()
            .eq_ignore_ascii_case("dark"),
    )
}

#[cfg(target_os = "windows")]
fn query_dark_mode() -> Option<bool> {
    // AppsUseLightTheme: 0x0 = dark, 0x1 = light
    let out = Command::new("reg")
        .args([
            "query",
            r"HKCU\Software\Microsoft\Windows\CurrentVersion\Themes\Personalize",
            "/v",
            "AppsUseLightTheme",
        ])
        .output()
        .ok()?;
    let stdout = String::from_utf8_lossy(&out.stdout);
    if stdout.contains("0x0") {
        Some(true)
    } else if stdout.contains("0x1") {
        Some(false)
    } else {
        None
    }
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn query_dark_mode() -> Option<bool> {
    let out = Command::new("gsettings")
        .args(["get", "org.gnome.desktop.interface", "color-scheme"])
        .output()
        .ok()?;
    if !out.status.success() {
        return None;
    }
    parse_color_scheme(&String::from_utf8_lossy(&out.stdout))
}

/// Parses gsettings output such as `'prefer-dark'`.
#[cfg_attr(any(target_os = "macos", target_os = "windows"), allow(dead_code))]
fn parse_color_scheme(value: &str) -> Option<bool> {
    match value.trim().trim_matches('\'') {
        "prefer-dark" => Some(true),
        "prefer-light" | "default" => Some(false),
        _ => None,
    }
}
