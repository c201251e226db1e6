use super::*;

fn env(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
    move |key| {
        pairs
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| value.to_string())
    }
}

#[test]
fn defaults_bind_locally_with_current_protocol() {
    let settings = Settings::default();
    assert_eq!(settings.bind_addr, "127.0.0.1:8080");
    assert_eq!(settings.protocol, ProtocolRevision::Current.table());
}

#[test]
fn file_values_override_defaults() {
    let mut settings = Settings::default();
    apply_file(
        &mut settings,
        "bind_addr = \"0.0.0.0:80\"\nprotocol = \"legacy\"\n",
    );
    assert_eq!(settings.bind_addr, "0.0.0.0:80");
    assert_eq!(settings.protocol, ProtocolRevision::Legacy.table());
}

#[test]
fn unreadable_file_leaves_defaults() {
    let mut settings = Settings::default();
    apply_file(&mut settings, "bind_addr = [1, 2]");
    assert_eq!(settings, Settings::default());
}

#[test]
fn env_overrides_file_and_app_prefix_wins() {
    let mut settings = Settings::default();
    apply_file(&mut settings, "bind_addr = \"0.0.0.0:80\"");
    apply_env(
        &mut settings,
        env(&[
            ("CONTROLLER_BIND", "127.0.0.1:9000"),
            ("APP__BIND_ADDR", "127.0.0.1:9001"),
            ("APP__PROTOCOL", "LEGACY"),
        ]),
    );
    assert_eq!(settings.bind_addr, "127.0.0.1:9001");
    assert_eq!(settings.protocol, ProtocolRevision::Legacy.table());
}

#[test]
fn unknown_protocol_keeps_previous_revision() {
    let mut settings = Settings::default();
    apply_env(&mut settings, env(&[("APP__PROTOCOL", "v3")]));
    assert_eq!(settings.protocol, ProtocolRevision::Current.table());
}

#[test]
fn protocol_table_in_file_overlays_current_codes() {
    let mut settings = Settings::default();
    apply_file(
        &mut settings,
        "bind_addr = \"0.0.0.0:80\"\n[protocol]\nauto_word = 8\ndisplay_off = 5\n",
    );
    assert_eq!(settings.bind_addr, "0.0.0.0:80");
    assert_eq!(
        settings.protocol,
        ProtocolTable {
            auto_word: 8,
            display_off: 5,
            ..ProtocolRevision::Current.table()
        }
    );
}

#[test]
fn ambiguous_protocol_table_is_ignored() {
    let mut settings = Settings::default();
    apply_file(&mut settings, "protocol = \"legacy\"");
    apply_file(&mut settings, "[protocol]\nstop = 1\n");
    assert_eq!(settings.protocol, ProtocolRevision::Legacy.table());
}
