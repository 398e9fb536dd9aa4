//! Scripted walk through the campus services survey.
//!
//! Run with `RUST_LOG=debug` to see the engine's own tracing output.

use campus_forms::{
    EngineConfig, FormBuilder, FormSession, FormStore, MemoryStore, MoveDirection, QuestionId,
    QuestionKindTag, Step,
};
use example_forms::{campus_services, course_feedback};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let definition = campus_services()?;
    for issue in definition.check() {
        tracing::warn!(%issue, "definition issue");
    }

    let store = MemoryStore::new()
        .with_form(definition.clone())
        .with_form(course_feedback()?);
    let config = EngineConfig::default().with_required_preview();
    let mut session = FormSession::open(&store, definition.id(), config)?;

    println!("=== {} ===", session.definition().title());
    println!("Section 1: {}", session.current_section().title());

    if let Step::Blocked { errors } = session.go_next() {
        println!("Next is blocked by {errors} unanswered field(s):");
        for (key, error) in session.errors().iter() {
            println!("  {key}: {error}");
        }
    }

    session.set_answer("role", "Graduate");
    session.toggle_choice(&QuestionId::new("used"), "Library");
    session.toggle_choice(&QuestionId::new("used"), "Dining");
    println!("{:?} ({:.0}% done)", session.go_next(), session.progress());

    let services = QuestionId::new("services");
    for (row, rank) in [("Library", 5), ("Sports Complex", 2), ("Dining Hall", 3)] {
        session.set_matrix_rank(&services, row, rank);
    }
    session.set_answer("recommend", "No");
    if session.request_preview().is_blocked() {
        println!("'why-not' appeared and is required:");
        for (key, error) in session.errors().iter() {
            println!("  {key}: {error}");
        }
    }
    session.set_answer("why-not", "Longer library hours.");
    session.request_preview();

    println!("\n=== Preview ===");
    for section in session.preview() {
        println!("{}", section.title);
        for answer in section.answers {
            let shown = answer
                .answer
                .map(|value| serde_json::to_string(&value))
                .transpose()?
                .unwrap_or_else(|| "(no answer)".to_string());
            println!("  {}: {shown}", answer.prompt);
        }
    }

    let payload = session.submit(&store)?;
    println!("\n=== Submitted ===");
    println!("{}", serde_json::to_string_pretty(&payload)?);

    // Authoring: a quick edit to the stored course feedback form.
    let mut builder = FormBuilder::edit(store.load(&"course-feedback".into())?);
    let extra = builder.add_section()?;
    let question = builder.add_question(&extra, QuestionKindTag::Checkbox)?;
    builder.set_prompt(&extra, &question, "Which labs did you use?")?;
    builder.move_section(&extra, MoveDirection::Up)?;
    builder.undo();
    println!(
        "\nEdited '{}': {} sections, undo available: {}",
        builder.definition().title(),
        builder.definition().section_count(),
        builder.can_undo()
    );

    Ok(())
}
