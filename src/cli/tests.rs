use super::ask::{exchange, ExchangeError};
use super::settings::{SettingError, SettingRegistry};
use super::*;
use crate::core::chat::{AskError, AskErrorKind, ChatClient, ChatClientConfig};
use crate::core::conversation::Conversation;
use crate::core::message::Message;
use crate::core::store::ConversationStore;
use crate::utils::test_utils::{completion, RecordingTransport};
use std::fs;
use tempfile::TempDir;

mod test_helpers {
    use super::*;

    pub(super) fn parse_args(argv: &[&str]) -> Args {
        Args::try_parse_from(argv)
            .unwrap_or_else(|err| panic!("argv={argv:?} should parse successfully: {err}"))
    }

    pub(super) fn words(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    pub(super) fn client(transport: &RecordingTransport) -> ChatClient<&RecordingTransport> {
        ChatClient::with_transport(
            ChatClientConfig {
                credential: "sk-test".to_string(),
                base_url: "https://api.test.com/v1".to_string(),
                preamble: "preamble".to_string(),
            },
            transport,
        )
    }
}

use test_helpers::{client, parse_args, words};

#[test]
fn test_model_flag_parsing() {
    let cases: [(&[&str], Option<&str>); 4] = [
        (&["h", "-m", "gpt-3.5-turbo"], Some("gpt-3.5-turbo")),
        (&["h", "--model", "gpt-4-32k"], Some("gpt-4-32k")),
        (&["h", "-m"], Some("")),
        (&["h"], None),
    ];

    for (argv, expected) in cases {
        let args = parse_args(argv);
        assert_eq!(args.model.as_deref(), expected, "argv={argv:?}");
    }
}

#[test]
fn test_prompt_continue_and_log_flags() {
    let args = parse_args(&["h", "-c", "-p", "what is a monad?", "-l", "chat.log"]);
    assert!(args.continue_conversation);
    assert_eq!(args.prompt.as_deref(), Some("what is a monad?"));
    assert_eq!(args.log, Some(PathBuf::from("chat.log")));
    assert!(args.command.is_none());

    let args = parse_args(&["h", "--continue", "--prompt", "and then?"]);
    assert!(args.continue_conversation);
    assert_eq!(args.prompt.as_deref(), Some("and then?"));

    let args = parse_args(&["h"]);
    assert!(!args.continue_conversation);
    assert!(args.prompt.is_none());
}

#[test]
fn test_set_and_unset_subcommands() {
    match parse_args(&["h", "set", "default-model", "gpt-4-0314"]).command {
        Some(Commands::Set { key, value }) => {
            assert_eq!(key.as_deref(), Some("default-model"));
            assert_eq!(value, words(&["gpt-4-0314"]));
        }
        _ => panic!("expected set subcommand"),
    }

    match parse_args(&["h", "set"]).command {
        Some(Commands::Set { key, value }) => {
            assert!(key.is_none());
            assert!(value.is_empty());
        }
        _ => panic!("expected set subcommand"),
    }

    match parse_args(&["h", "unset", "base-url"]).command {
        Some(Commands::Unset { key }) => assert_eq!(key, "base-url"),
        _ => panic!("expected unset subcommand"),
    }
}

#[test]
fn test_default_model_setting_validates_allow_list() {
    let registry = SettingRegistry::new();
    let handler = registry.get("default-model").expect("handler registered");
    let mut config = Config::default();

    let message = handler.set(&words(&["gpt-3.5-turbo"]), &mut config).unwrap();
    assert_eq!(message, "✅ Set default-model to: gpt-3.5-turbo");
    assert_eq!(config.default_model.as_deref(), Some("gpt-3.5-turbo"));

    let err = handler.set(&words(&["gpt-4o"]), &mut config).unwrap_err();
    assert!(matches!(err, SettingError::UnknownModel(ref model) if model == "gpt-4o"));
    assert_eq!(config.default_model.as_deref(), Some("gpt-3.5-turbo"));

    assert!(matches!(
        handler.set(&[], &mut config),
        Err(SettingError::MissingArgs { .. })
    ));

    handler.unset(&mut config);
    assert!(config.default_model.is_none());
}

#[test]
fn test_base_url_setting_requires_http_scheme() {
    let registry = SettingRegistry::new();
    let handler = registry.get("base-url").expect("handler registered");
    let mut config = Config::default();

    handler
        .set(&words(&["http://localhost:8080/v1"]), &mut config)
        .unwrap();
    assert_eq!(config.base_url.as_deref(), Some("http://localhost:8080/v1"));

    assert!(matches!(
        handler.set(&words(&["localhost:8080"]), &mut config),
        Err(SettingError::InvalidValue { key: "base-url", .. })
    ));
}

#[test]
fn test_preamble_file_setting_requires_existing_file() {
    let temp_dir = TempDir::new().unwrap();
    let preamble = temp_dir.path().join("prompt.md");
    fs::write(&preamble, "Be brief.").unwrap();

    let registry = SettingRegistry::new();
    let handler = registry.get("preamble-file").expect("handler registered");
    let mut config = Config::default();

    fs::create_dir(temp_dir.path().join("nested")).unwrap();
    let indirect = temp_dir.path().join("nested").join("..").join("prompt.md");
    handler
        .set(&words(&[indirect.to_str().unwrap()]), &mut config)
        .unwrap();
    let stored = config.preamble_file.clone().expect("preamble file stored");
    assert!(stored.is_absolute());
    assert_eq!(stored, fs::canonicalize(&preamble).unwrap());
    assert!(!stored
        .components()
        .any(|part| part == std::path::Component::ParentDir));

    let missing = temp_dir.path().join("missing.md");
    assert!(handler
        .set(&words(&[missing.to_str().unwrap()]), &mut config)
        .is_err());
}

#[test]
fn test_unknown_setting_key() {
    let registry = SettingRegistry::new();
    assert!(registry.get("theme").is_none());
    assert_eq!(
        registry.keys().collect::<Vec<_>>(),
        vec!["default-model", "base-url", "preamble-file"]
    );
}

#[tokio::test]
async fn exchange_without_continue_ignores_saved_conversation() {
    let temp_dir = TempDir::new().unwrap();
    let store = ConversationStore::in_dir(temp_dir.path());
    fs::write(store.path(), "not even json").unwrap();

    let transport = RecordingTransport::replying(200, completion("fresh"));
    let reply = exchange(&client(&transport), &store, "hi", "gpt-4", false)
        .await
        .unwrap();

    assert_eq!(reply.conversation.len(), 3);
    assert_eq!(transport.calls(), 1);
}

#[tokio::test]
async fn exchange_continues_saved_conversation() {
    let temp_dir = TempDir::new().unwrap();
    let store = ConversationStore::in_dir(temp_dir.path());

    let mut saved = Conversation::new("old preamble");
    saved.append_user_turn("first").unwrap();
    saved.append_assistant_turn("one").unwrap();
    store.save(&saved).unwrap();

    let transport = RecordingTransport::replying(200, completion("two"));
    let reply = exchange(&client(&transport), &store, "second", "gpt-4", true)
        .await
        .unwrap();

    assert_eq!(
        reply.conversation.messages(),
        &[
            Message::system("old preamble"),
            Message::user("first"),
            Message::assistant("one"),
            Message::user("second"),
            Message::assistant("two"),
        ]
    );
}

#[tokio::test]
async fn exchange_with_nothing_saved_starts_fresh() {
    let temp_dir = TempDir::new().unwrap();
    let store = ConversationStore::in_dir(temp_dir.path());
    fs::write(store.path(), "").unwrap();

    let transport = RecordingTransport::replying(200, completion("hello"));
    let reply = exchange(&client(&transport), &store, "hi", "gpt-4", true)
        .await
        .unwrap();

    assert_eq!(reply.conversation.messages()[0], Message::system("preamble"));
    assert_eq!(reply.conversation.len(), 3);
}

#[tokio::test]
async fn exchange_refuses_corrupt_saved_conversation_without_sending() {
    let temp_dir = TempDir::new().unwrap();
    let store = ConversationStore::in_dir(temp_dir.path());
    fs::write(store.path(), "[{\"role\":").unwrap();

    let transport = RecordingTransport::replying(200, completion("unused"));
    let err = exchange(&client(&transport), &store, "hi", "gpt-4", true)
        .await
        .unwrap_err();

    assert!(err.is_malformed_conversation());
    match err {
        ExchangeError::Ask(AskError::MalformedConversation(cause)) => {
            assert!(cause.to_string().starts_with("Saved conversation is malformed"))
        }
        other => panic!("expected malformed conversation, got {other:?}"),
    }
    assert_eq!(transport.calls(), 0);
    assert_eq!(fs::read_to_string(store.path()).unwrap(), "[{\"role\":");
}

#[tokio::test]
async fn exchange_refuses_unanswered_saved_turn_without_sending() {
    let temp_dir = TempDir::new().unwrap();
    let store = ConversationStore::in_dir(temp_dir.path());
    fs::write(
        store.path(),
        r#"[{"role":"system","content":"p"},{"role":"user","content":"dangling"}]"#,
    )
    .unwrap();

    let transport = RecordingTransport::replying(200, completion("unused"));
    let err = exchange(&client(&transport), &store, "hi", "gpt-4", true)
        .await
        .unwrap_err();

    assert!(err.is_malformed_conversation());
    assert_eq!(transport.calls(), 0);
}

#[tokio::test]
async fn exchange_with_empty_saved_array_starts_fresh() {
    let temp_dir = TempDir::new().unwrap();
    let store = ConversationStore::in_dir(temp_dir.path());
    fs::write(store.path(), "[]").unwrap();

    let transport = RecordingTransport::replying(200, completion("hello"));
    let reply = exchange(&client(&transport), &store, "hi", "gpt-4", true)
        .await
        .unwrap();

    assert_eq!(reply.conversation.messages()[0], Message::system("preamble"));
    assert_eq!(reply.conversation.len(), 3);
}

#[tokio::test]
async fn failed_exchange_leaves_saved_conversation_untouched() {
    let temp_dir = TempDir::new().unwrap();
    let store = ConversationStore::in_dir(temp_dir.path());
    let saved = Conversation::new("preamble");
    store.save(&saved).unwrap();
    let before = fs::read_to_string(store.path()).unwrap();

    let transport = RecordingTransport::replying(200, serde_json::json!({"choices": []}));
    let err = exchange(&client(&transport), &store, "hi", "gpt-4", true)
        .await
        .unwrap_err();

    match err {
        ExchangeError::Ask(ask_err) => assert_eq!(ask_err.kind(), AskErrorKind::Protocol),
        other => panic!("expected ask error, got {other:?}"),
    }
    assert_eq!(fs::read_to_string(store.path()).unwrap(), before);
}
