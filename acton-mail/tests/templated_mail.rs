//! End-to-end composition against the minijinja provider and on-disk templates

use std::path::PathBuf;

use acton_mail::config::{BackendKind, EmailSettings, MailConfig, TemplateSettings};
use acton_mail::email::{
    Alternative, Attachment, EmailError, EmailSender, Envelope, Mailer, MemoryBackend,
    MessageOptions, PlaintextDeriver,
};
use acton_mail::template::{Context, JinjaTemplates, Variables};
use serde_json::json;

fn template_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/templates")
}

fn mailer() -> Mailer<JinjaTemplates> {
    Mailer::new(JinjaTemplates::from_dir(template_dir()))
}

fn envelope() -> Envelope {
    Envelope::new("person@example.com", ["people@example.com"])
}

fn vars(value: serde_json::Value) -> Variables {
    value.as_object().cloned().unwrap_or_default()
}

#[test]
fn plaintext_only_template() {
    let email = mailer()
        .render_mail("shortcuts/plain.tpl", envelope(), Variables::new())
        .unwrap();

    assert_eq!(email.subject, "Plain text only");
    assert_eq!(email.body, "This message should only have plain text");
    assert!(email.alternative.is_none());
    assert!(email.attachments.is_empty());
    assert_eq!(email.from, "person@example.com");
    assert_eq!(email.to, vec!["people@example.com"]);
}

#[test]
fn html_only_template_gets_generated_plaintext() {
    let email = mailer()
        .render_mail("shortcuts/html.tpl", envelope(), Variables::new())
        .unwrap();

    assert_eq!(
        email.body,
        "This message should be multipart and have an auto generated plaintext component"
    );
    assert_eq!(
        email.alternative,
        Some(Alternative::html(
            "<p>This message should be multipart and have an auto generated plaintext component</p>"
        ))
    );
}

#[test]
fn html_only_template_without_derivation() {
    let email = mailer()
        .with_plaintext(PlaintextDeriver::Disabled)
        .render_mail("shortcuts/html.tpl", envelope(), Variables::new())
        .unwrap();

    assert_eq!(email.body, "");
    assert!(email.is_multipart());
}

#[test]
fn plain_and_html_template() {
    let email = mailer()
        .render_mail(
            "shortcuts/plain_and_html.tpl",
            envelope(),
            vars(json!({"name": "Ada"})),
        )
        .unwrap();

    assert_eq!(email.subject, "Both parts for Ada");
    assert_eq!(email.body, "This is the plaintext block");
    assert_eq!(
        email.alternative,
        Some(Alternative::html("<span> This is the html block </span>"))
    );
}

#[test]
fn multiline_subject_is_collapsed() {
    let email = mailer()
        .render_mail(
            "shortcuts/multiline_subject.tpl",
            envelope(),
            vars(json!({"order": 1042, "tracking": "ZX-1"})),
        )
        .unwrap();

    assert_eq!(email.subject, "Your order 1042 has shipped");
    assert_eq!(email.body, "Tracking: ZX-1");
}

#[test]
fn blocks_inside_control_structures_are_found() {
    let email = mailer()
        .render_mail(
            "shortcuts/conditional.tpl",
            envelope(),
            vars(json!({"name": "Ada", "include_footer": false, "items": []})),
        )
        .unwrap();

    assert_eq!(email.body, "Hello Ada, this block sits inside a condition.");
    assert_eq!(email.html(), Some("<ul><li>Ada</li></ul>"));
}

#[test]
fn child_template_exposes_its_own_blocks() {
    let email = mailer()
        .render_mail("shortcuts/child.tpl", envelope(), vars(json!({"name": "Ada"})))
        .unwrap();

    assert_eq!(email.subject, "Child subject for Ada");
    assert_eq!(email.body, "");
}

#[test]
fn missing_template_is_reported() {
    let err = mailer()
        .render_mail("shortcuts/missing.tpl", envelope(), Variables::new())
        .unwrap_err();

    assert!(err.is_template_not_found());
    assert_eq!(err.to_string(), "template not found: shortcuts/missing.tpl");
}

#[test]
fn envelope_fields_and_attachments_pass_through() {
    let envelope = envelope()
        .cc("cc@example.com")
        .bcc("bcc@example.com")
        .file("a.txt")
        .file("b.txt")
        .options(
            MessageOptions::new()
                .header("X-Mailer", "acton-mail")
                .reply_to("support@example.com"),
        );

    let email = mailer()
        .render_mail("shortcuts/plain.tpl", envelope, Variables::new())
        .unwrap();

    assert_eq!(email.cc, vec!["cc@example.com"]);
    assert_eq!(email.bcc, vec!["bcc@example.com"]);
    assert_eq!(email.reply_to, vec!["support@example.com"]);
    assert_eq!(
        email.headers,
        vec![("X-Mailer".to_string(), "acton-mail".to_string())]
    );
    assert_eq!(
        email.attachments,
        vec![Attachment::file("a.txt"), Attachment::file("b.txt")]
    );
}

#[test]
fn caller_context_is_restored() {
    let mailer = mailer();
    let mut context = Context::new();
    context.insert("name", "Base");
    let before = context.clone();

    let email = mailer
        .render_mail_with_context(
            "shortcuts/plain_and_html.tpl",
            envelope(),
            vars(json!({"name": "Pushed"})),
            &mut context,
        )
        .unwrap();

    assert_eq!(email.subject, "Both parts for Pushed");
    assert_eq!(context, before);
}

#[test]
fn strict_render_failure_restores_context() {
    let templates = JinjaTemplates::from_settings(&TemplateSettings {
        template_dir: template_dir(),
        strict_undefined: true,
        ..TemplateSettings::default()
    });
    let mut context = Context::new();
    context.insert("site", "example.com");
    let before = context.clone();

    let err = Mailer::new(templates)
        .render_mail_with_context(
            "shortcuts/strict.tpl",
            envelope(),
            vars(json!({"user": "ada"})),
            &mut context,
        )
        .unwrap_err();

    assert!(matches!(err, EmailError::Render { ref section, .. } if section == "html"));
    assert_eq!(context, before);
}

#[test]
fn failure_outside_blocks_does_not_abort_composition() {
    let email = mailer()
        .render_mail(
            "shortcuts/broken_outside.tpl",
            envelope(),
            vars(json!({"name": "Ada"})),
        )
        .unwrap();

    assert_eq!(email.subject, "Hi Ada");
    assert_eq!(email.body, "Body for Ada");
    assert!(email.alternative.is_none());
}

#[test]
fn from_config_reads_template_dir_and_derivation() {
    let config = MailConfig {
        templates: TemplateSettings {
            template_dir: template_dir(),
            ..TemplateSettings::default()
        },
        email: EmailSettings {
            derive_plaintext: false,
            ..EmailSettings::default()
        },
    };

    let email = Mailer::from_config(&config)
        .render_mail("shortcuts/html.tpl", envelope(), Variables::new())
        .unwrap();

    assert_eq!(email.body, "");
    assert!(email.html().is_some());
}

#[tokio::test]
async fn send_with_memory_backend() {
    let outbox = MemoryBackend::new();

    let sent = mailer()
        .send_with(
            &outbox,
            "shortcuts/plain_and_html.tpl",
            envelope(),
            vars(json!({"name": "Ada"})),
        )
        .await
        .unwrap();

    assert_eq!(outbox.outbox(), vec![sent]);
}

#[tokio::test]
async fn send_templated_mail_through_memory_connection() {
    let settings = EmailSettings {
        backend: BackendKind::Memory,
        ..EmailSettings::default()
    };
    let envelope = Envelope::new("person@example.com", ["integration-outbox@example.com"]);

    mailer()
        .with_settings(settings)
        .send_templated_mail("shortcuts/plain.tpl", envelope, Variables::new(), false)
        .await
        .unwrap();

    let delivered = MemoryBackend::global();
    assert!(delivered.was_sent_to("integration-outbox@example.com"));
}

#[tokio::test]
async fn memory_backend_is_an_email_sender() {
    let outbox = MemoryBackend::new();
    let sender: &dyn EmailSender = &outbox;

    let email = mailer()
        .render_mail("shortcuts/plain.tpl", envelope(), Variables::new())
        .unwrap();
    sender.send(email).await.unwrap();

    assert_eq!(outbox.sent_count(), 1);
}
