use flipbook::config::{SpotifyConfig, SpotifyCredentials};
use flipbook::spotify::ScannableCodes;

#[test]
fn test_scannable_url_default_colors() {
    let codes = ScannableCodes::default();

    assert_eq!(
        codes.scannable_url("spotify:track:4uLU6hMCjMI75M1A2tKUQC"),
        "https://scannables.scdn.co/uri/plain/svg/000000/white/640/spotify%3Atrack%3A4uLU6hMCjMI75M1A2tKUQC"
    );
}

#[test]
fn test_scannable_url_custom_colors() {
    let codes = ScannableCodes::new("ffffff", "black", 640);

    assert_eq!(
        codes.scannable_url("spotify:track:4uLU6hMCjMI75M1A2tKUQC"),
        "https://scannables.scdn.co/uri/plain/svg/ffffff/black/640/spotify%3Atrack%3A4uLU6hMCjMI75M1A2tKUQC"
    );
}

#[test]
fn test_scannable_url_is_deterministic() {
    let codes = ScannableCodes::default();
    let uri = "spotify:playlist:37i9dQZF1DXcBWIGoYBM5M";

    assert_eq!(codes.scannable_url(uri), codes.scannable_url(uri));
    assert!(codes.scannable_url(uri).ends_with("spotify%3Aplaylist%3A37i9dQZF1DXcBWIGoYBM5M"));
}

#[test]
fn test_credentials_require_both_halves() {
    let mut config = SpotifyConfig::default();
    assert!(config.credentials().is_none());

    config.client_id = Some("client-id".to_string());
    assert!(config.credentials().is_none());

    config.client_secret = Some(String::new());
    assert!(config.credentials().is_none());

    config.client_secret = Some("client-secret".to_string());
    assert_eq!(
        config.credentials(),
        Some(SpotifyCredentials {
            client_id: "client-id".to_string(),
            client_secret: "client-secret".to_string(),
        })
    );
}

#[test]
fn test_default_endpoints() {
    let config = SpotifyConfig::default();

    assert_eq!(config.api_url, "https://api.spotify.com/v1");
    assert_eq!(config.token_url, "https://accounts.spotify.com/api/token");
    assert_eq!(config.oembed_url, "https://open.spotify.com/oembed");
}
