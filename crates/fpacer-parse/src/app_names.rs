//! Package-name discovery and package → app-name resolution.

use regex::Regex;
use std::sync::LazyLock;

/// Placeholder app name when nothing better is known.
pub const UNKNOWN_APP: &str = "Unknown App";

/// Placeholder package name when nothing better is known.
pub const UNKNOWN_PACKAGE: &str = "Unknown Package";

/// Matches a dotted identifier with at least 3 segments, e.g.
/// `com.netflix.mediaclient.ui.Player#3`.
/// Captures: 1=first three segments
static PACKAGE_LIKE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([A-Za-z_][A-Za-z0-9_]*\.[A-Za-z_][A-Za-z0-9_]*\.[A-Za-z_][A-Za-z0-9_]*)")
        .expect("Invalid PACKAGE_LIKE_REGEX")
});

/// Matches a whole string that is nothing but a dotted package name, e.g.
/// `com.netflix.mediaclient` but not `com.netflix.mediaclient.ui.Player#3`.
static PLAIN_PACKAGE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)+$")
        .expect("Invalid PLAIN_PACKAGE_REGEX")
});

/// Exact package → display name mappings.
const KNOWN_PACKAGES: &[(&str, &str)] = &[
    ("com.netflix.mediaclient", "Netflix"),
    ("com.google.android.youtube", "YouTube"),
    ("com.google.android.apps.youtube.music", "YouTube Music"),
    ("com.google.android.apps.maps", "Google Maps"),
    ("com.google.android.gm", "Gmail"),
    ("com.android.chrome", "Chrome"),
    ("com.google.android.apps.photos", "Google Photos"),
    ("com.spotify.music", "Spotify"),
    ("com.instagram.android", "Instagram"),
    ("com.facebook.katana", "Facebook"),
    ("com.facebook.orca", "Messenger"),
    ("com.whatsapp", "WhatsApp"),
    ("com.twitter.android", "X"),
    ("com.zhiliaoapp.musically", "TikTok"),
    ("com.ss.android.ugc.trill", "TikTok"),
    ("com.snapchat.android", "Snapchat"),
    ("com.pinterest", "Pinterest"),
    ("com.reddit.frontpage", "Reddit"),
    ("com.discord", "Discord"),
    ("org.telegram.messenger", "Telegram"),
    ("com.amazon.mShop.android.shopping", "Amazon Shopping"),
    ("com.amazon.avod.thirdpartyclient", "Prime Video"),
    ("com.disney.disneyplus", "Disney+"),
    ("com.hbo.hbonow", "Max"),
    ("tv.twitch.android.app", "Twitch"),
    ("com.ubercab", "Uber"),
    ("com.airbnb.android", "Airbnb"),
    ("com.linkedin.android", "LinkedIn"),
    ("com.microsoft.teams", "Microsoft Teams"),
    ("us.zoom.videomeetings", "Zoom"),
    ("com.supercell.clashofclans", "Clash of Clans"),
    ("com.supercell.clashroyale", "Clash Royale"),
    ("com.king.candycrushsaga", "Candy Crush Saga"),
    ("com.tencent.ig", "PUBG Mobile"),
    ("com.activision.callofduty.shooter", "Call of Duty Mobile"),
    ("com.mojang.minecraftpe", "Minecraft"),
    ("com.roblox.client", "Roblox"),
    ("com.miHoYo.GenshinImpact", "Genshin Impact"),
];

/// Substring → display name heuristics, checked in order against the
/// lowercased package.
const PACKAGE_KEYWORDS: &[(&str, &str)] = &[
    ("netflix", "Netflix"),
    ("youtube", "YouTube"),
    ("spotify", "Spotify"),
    ("instagram", "Instagram"),
    ("facebook", "Facebook"),
    ("whatsapp", "WhatsApp"),
    ("tiktok", "TikTok"),
    ("musically", "TikTok"),
    ("snapchat", "Snapchat"),
    ("twitter", "X"),
    ("chrome", "Chrome"),
    ("firefox", "Firefox"),
    ("maps", "Maps"),
    ("camera", "Camera"),
    ("gallery", "Gallery"),
    ("launcher", "Launcher"),
    ("settings", "Settings"),
    ("pubg", "PUBG Mobile"),
    ("genshin", "Genshin Impact"),
    ("minecraft", "Minecraft"),
    ("roblox", "Roblox"),
    ("candycrush", "Candy Crush"),
    ("clashofclans", "Clash of Clans"),
    ("callofduty", "Call of Duty Mobile"),
    ("twitch", "Twitch"),
    ("disney", "Disney+"),
];

/// Whether `s` is a bare dotted package name with no class or test suffix.
pub fn is_plain_package(s: &str) -> bool {
    PLAIN_PACKAGE_REGEX.is_match(s)
}

/// Derive a display name for a package.
///
/// Exact table, then keyword heuristics, then the capitalised last dotted
/// segment, then [`UNKNOWN_APP`].
pub fn app_name_from_package(package: &str) -> String {
    let package = package.trim();
    if package.is_empty() || package == UNKNOWN_PACKAGE {
        return UNKNOWN_APP.to_string();
    }

    if let Some((_, name)) = KNOWN_PACKAGES.iter().find(|(pkg, _)| *pkg == package) {
        return (*name).to_string();
    }

    let lowered = package.to_lowercase();
    if let Some((_, name)) = PACKAGE_KEYWORDS
        .iter()
        .find(|(keyword, _)| lowered.contains(keyword))
    {
        return (*name).to_string();
    }

    package
        .rsplit('.')
        .next()
        .and_then(capitalize)
        .unwrap_or_else(|| UNKNOWN_APP.to_string())
}

/// Best-effort package name from a frame row's test identifier.
///
/// Takes the first three segments of the first dotted identifier with at
/// least three segments.
pub fn package_from_test_id(test_id: &str) -> Option<String> {
    PACKAGE_LIKE_REGEX
        .captures(test_id)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

fn capitalize(segment: &str) -> Option<String> {
    let mut chars = segment.chars();
    let first = chars.next()?;
    if !first.is_alphabetic() {
        return None;
    }
    Some(first.to_uppercase().chain(chars).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_plain_package() {
        assert!(is_plain_package("com.netflix.mediaclient"));
        assert!(is_plain_package("com.whatsapp"));
        assert!(!is_plain_package("com.example.shooter.GameActivity#0"));
        assert!(!is_plain_package("com.example/.Main"));
        assert!(!is_plain_package("Outer$Inner.run"));
        assert!(!is_plain_package("60.0"));
        assert!(!is_plain_package("shooter"));
    }

    #[test]
    fn test_exact_match() {
        assert_eq!(app_name_from_package("com.netflix.mediaclient"), "Netflix");
        assert_eq!(app_name_from_package("com.whatsapp"), "WhatsApp");
    }

    #[test]
    fn test_keyword_match() {
        assert_eq!(app_name_from_package("com.netflix.ninja"), "Netflix");
        assert_eq!(app_name_from_package("com.sec.android.app.camera"), "Camera");
    }

    #[test]
    fn test_last_segment_fallback() {
        assert_eq!(app_name_from_package("com.example.coolracer"), "Coolracer");
    }

    #[test]
    fn test_unknown_fallbacks() {
        assert_eq!(app_name_from_package(""), UNKNOWN_APP);
        assert_eq!(app_name_from_package(UNKNOWN_PACKAGE), UNKNOWN_APP);
        assert_eq!(app_name_from_package("com.example.42"), UNKNOWN_APP);
    }

    #[test]
    fn test_package_from_test_id() {
        assert_eq!(
            package_from_test_id("com.netflix.mediaclient.ui.PlayerActivity#0").as_deref(),
            Some("com.netflix.mediaclient")
        );
        assert_eq!(
            package_from_test_id("SurfaceView - com.example.game/com.unity.Player").as_deref(),
            Some("com.example.game")
        );
        assert_eq!(package_from_test_id("run-1"), None);
        assert_eq!(package_from_test_id("two.segments"), None);
    }
}
