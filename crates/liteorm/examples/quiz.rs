//! A small quiz backend: questions with answers, player scores, JSON output.
//!
//! Run with: cargo run --example quiz -p liteorm
//!
//! Settings come from the environment or a .env file:
//! LITEORM_DATABASE=:memory:
//! LITEORM_TRACE=1
//! RUST_LOG=liteorm=debug

use liteorm::prelude::*;
use liteorm::{ReturningMode, model_fields};
use liteorm_json::{
    FieldDef, JsonBindings, JsonModel, Serializable, TypeDesc, field, json_fields, json_nested,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default, Clone)]
struct Answer {
    id: i64,
    question: i64,
    text: String,
    is_correct: bool,
}

impl Model for Answer {
    fn table_def() -> TableDef {
        TableDef::new()
            .named("answers")
            .column(Column::of::<i64>("id").constraint(ColumnConstraint::primary_autoincrement()))
            .column(
                Column::of::<i64>("question_id")
                    .with_field_name("question")
                    .constraint(ColumnConstraint::references("questions", "id")),
            )
            .column(Column::of::<String>("text").constraint(ColumnConstraint::not_null()))
            .column(Column::of::<bool>("is_correct"))
    }

    model_fields!(Answer { id, question, text, is_correct });
}

impl JsonModel for Answer {
    fn fields() -> Vec<FieldDef> {
        vec![
            field("id", TypeDesc::integer()),
            field("text", TypeDesc::string()),
            field("is_correct", (TypeDesc::boolean(), "correct")),
        ]
    }

    json_fields!(Answer { id, question, text, is_correct });
}

json_nested!(Answer);

#[derive(Debug, Default, Clone)]
struct Question {
    id: i64,
    text: String,
    position: i64,
    answers: Vec<Answer>,
}

impl Model for Question {
    fn table_def() -> TableDef {
        TableDef::new()
            .named("questions")
            .column(Column::of::<i64>("id").constraint(ColumnConstraint::primary_autoincrement()))
            .column(Column::of::<String>("text").constraint(ColumnConstraint::not_null()))
            .column(Column::of::<i64>("position").constraint(ColumnConstraint::check("position > 0")))
    }

    model_fields!(Question { id, text, position });
}

impl JsonModel for Question {
    fn fields() -> Vec<FieldDef> {
        vec![
            field("id", TypeDesc::integer()),
            field("text", TypeDesc::string()),
            field("position", TypeDesc::integer()),
            field("answers", TypeDesc::list_of(TypeDesc::model::<Answer>())),
        ]
    }

    json_fields!(Question { id, text, position, answers });
}

#[derive(Debug, Default, Clone)]
struct Score {
    player: String,
    points: i64,
}

impl Model for Score {
    fn table_def() -> TableDef {
        TableDef::new()
            .named("scores")
            .column(Column::of::<String>("player").constraint(ColumnConstraint::primary()))
            .column(Column::of::<i64>("points").constraint(ColumnConstraint::default_expr("0")))
    }

    model_fields!(Score { player, points });
}

impl JsonModel for Score {
    fn fields() -> Vec<FieldDef> {
        vec![
            field("player", ("name", TypeDesc::string())),
            field("points", TypeDesc::integer()),
        ]
    }

    json_fields!(Score { player, points });
}

/// Insert a question at `position`, moving later questions down by one.
fn insert_question(
    db: &Database,
    text: &str,
    position: i64,
    answers: &[(&str, bool)],
) -> OrmResult<Question> {
    db.execute(
        "UPDATE questions SET position = position + 1 WHERE position >= :position",
        &params!("position" => position),
    )?;

    let mut question = Question {
        text: text.to_string(),
        position,
        ..Default::default()
    };
    question.add(db, &["id"])?;

    for (text, is_correct) in answers {
        let mut answer = Answer {
            question: question.id,
            text: text.to_string(),
            is_correct: *is_correct,
            ..Default::default()
        };
        answer.add(db, &["id"])?;
        question.answers.push(answer);
    }
    Ok(question)
}

fn load_quiz(db: &Database) -> OrmResult<Vec<Question>> {
    let mut questions = Question::list(db, None, Some(Order::asc("position")), &Params::new())?;
    for question in &mut questions {
        question.answers = Answer::list(
            db,
            Some("question_id = :question"),
            Some(Order::asc("id")),
            &params!("question" => question.id),
        )?;
    }
    Ok(questions)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = DatabaseConfig::from_env().auto_create_tables(true);
    let db = Database::open(config)?;
    println!(
        "Opened {} (RETURNING {})",
        db.config().path,
        if db.supports_returning() { "native" } else { "emulated" }
    );
    if db.config().returning == ReturningMode::Emulate {
        println!("Generated ids are read back with a follow-up SELECT");
    }

    db.register::<Question>()?;
    db.register::<Answer>()?;
    db.register::<Score>()?;
    Answer::delete_all(&db)?;
    Question::delete_all(&db)?;
    Score::delete_all(&db)?;

    let bindings = JsonBindings::with_indent(2);
    bindings.register::<Answer>()?;
    bindings.register::<Question>()?;
    bindings.register::<Score>()?;

    // ============================================
    // Questions, inserted out of order
    // ============================================
    println!("\n=== Building the quiz ===");
    insert_question(&db, "Capital of France?", 1, &[("Paris", true), ("Lyon", false)])?;
    insert_question(&db, "2 + 2?", 1, &[("4", true), ("5", false)])?;
    insert_question(&db, "Largest planet?", 2, &[("Jupiter", true), ("Mars", false)])?;

    let quiz = load_quiz(&db)?;
    println!("{}", Question::to_json_list(&bindings, &quiz)?);

    // ============================================
    // Scores
    // ============================================
    println!("\n=== Scores ===");
    for (player, points) in [("ann", 3), ("bob", 1)] {
        let mut score = Score {
            player: player.to_string(),
            points,
        };
        score.add(&db, &[])?;
    }

    let mut bob = Score::require(&db, &params!("player" => "bob"))?;
    bob.points += 1;
    bob.save(&db)?;

    let order = Order::desc("points").then_asc("player");
    let board = Score::list(&db, None, Some(order), &Params::new())?;
    println!("{}", Score::to_json_list(&bindings, &board)?);

    // Incoming JSON: the player name is aliased on the wire.
    let mut carol = Score::from_json(&bindings, r#"{"name": "carol", "points": 0}"#)?;
    carol.add(&db, &["points"])?;
    println!(
        "carol joined with {} points; {} players total",
        carol.points,
        Score::count(&db, None, &Params::new())?
    );

    match Score::require(&db, &params!("player" => "dave")) {
        Err(err) if err.is_not_found() => println!("{err}"),
        other => println!("unexpected: {other:?}"),
    }

    db.close()?;
    Ok(())
}
