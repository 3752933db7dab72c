//! One type stored with liteorm and exchanged as JSON.

use liteorm::prelude::*;
use liteorm::model_fields;
use liteorm_json::{FieldDef, JsonBindings, JsonModel, Serializable, TypeDesc, field, json_fields};

#[derive(Debug, Default, Clone, PartialEq)]
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
            .column(Column::of::<i64>("question_id").with_field_name("question"))
            .column(Column::of::<String>("text"))
            .column(Column::of::<bool>("is_correct"))
    }

    model_fields!(Answer { id, question, text, is_correct });
}

impl JsonModel for Answer {
    fn fields() -> Vec<FieldDef> {
        vec![
            field("id", TypeDesc::integer()),
            field("text", TypeDesc::string()),
            field("is_correct", ("correct", TypeDesc::boolean())),
        ]
    }

    json_fields!(Answer { id, question, text, is_correct });
}

fn setup() -> (Database, JsonBindings) {
    let db = Database::open(DatabaseConfig::memory().auto_create_tables(true)).unwrap();
    db.register::<Answer>().unwrap();
    let bindings = JsonBindings::new();
    bindings.register::<Answer>().unwrap();
    (db, bindings)
}

#[test]
fn stored_rows_serialize_to_the_wire_layout() {
    let (db, bindings) = setup();
    for (text, is_correct) in [("4", true), ("5", false)] {
        let mut answer = Answer {
            question: 1,
            text: text.into(),
            is_correct,
            ..Default::default()
        };
        answer.add(&db, &["id"]).unwrap();
    }

    let answers = Answer::list(
        &db,
        Some("question_id = :question"),
        Some(Order::asc("id")),
        &params!("question" => 1i64),
    )
    .unwrap();
    assert!(answers[0].is_correct);

    let text = Answer::to_json_list(&bindings, &answers).unwrap();
    assert_eq!(
        text,
        r#"[{"id":1,"text":"4","correct":true},{"id":2,"text":"5","correct":false}]"#
    );
}

#[test]
fn decoded_input_is_stored_as_sent() {
    let (db, bindings) = setup();
    let mut answer =
        Answer::from_json(&bindings, r#"{"id": 0, "text": "Paris", "correct": 1, "extra": null}"#).unwrap();
    answer.question = 3;
    assert!(answer.add(&db, &["id"]).unwrap());

    let stored = Answer::require(&db, &params!("id" => answer.id)).unwrap();
    assert_eq!(stored, answer);
    assert!(stored.is_correct);

    let raw = db
        .query("SELECT is_correct FROM answers WHERE id = :id", &params!("id" => answer.id))
        .unwrap();
    assert_eq!(raw.scalar(), Some(&Value::Integer(1)));
}
