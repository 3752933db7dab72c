use liteorm::prelude::*;
use liteorm::{ReturningMode, Select, TracingSqlHook, Update, model_fields};
use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

#[derive(Debug, Default, Clone, PartialEq)]
struct Question {
    id: i64,
    text: String,
    position: i64,
    image: Option<String>,
}

impl Model for Question {
    fn table_def() -> TableDef {
        TableDef::new()
            .named("questions")
            .column(Column::of::<i64>("id").constraint(ColumnConstraint::primary_autoincrement()))
            .column(Column::of::<String>("text").constraint(ColumnConstraint::not_null()))
            .column(Column::of::<i64>("position").constraint(ColumnConstraint::not_null()))
            .column(Column::of::<Option<String>>("image_url").with_field_name("image"))
    }

    model_fields!(Question { id, text, position, image });
}

#[derive(Debug, Default, Clone, PartialEq)]
struct Score {
    quiz: String,
    player: String,
    points: i64,
}

impl Model for Score {
    fn table_def() -> TableDef {
        TableDef::new()
            .named("scores")
            .column(Column::of::<String>("quiz"))
            .column(Column::of::<String>("player"))
            .column(Column::of::<i64>("points").constraint(ColumnConstraint::default_expr("0")))
            .constraint(TableConstraint::primary_key(["quiz", "player"]))
    }

    model_fields!(Score { quiz, player, points });
}

fn open(mode: ReturningMode) -> Database {
    let db = Database::open(
        DatabaseConfig::memory()
            .auto_create_tables(true)
            .returning(mode),
    )
    .unwrap();
    db.register::<Question>().unwrap();
    db.register::<Score>().unwrap();
    db
}

fn question(text: &str, position: i64) -> Question {
    Question {
        text: text.to_string(),
        position,
        ..Default::default()
    }
}

fn seed(db: &Database) -> Vec<Question> {
    ["first", "second", "third"]
        .into_iter()
        .zip(1..)
        .map(|(text, position)| {
            let mut q = question(text, position);
            assert!(q.add(db, &["id"]).unwrap());
            q
        })
        .collect()
}

#[test]
fn add_reads_back_generated_ids() {
    for mode in [ReturningMode::Native, ReturningMode::Emulate] {
        let db = open(mode);
        let added = seed(&db);
        let ids: Vec<i64> = added.iter().map(|q| q.id).collect();
        assert_eq!(ids, [1, 2, 3], "{mode:?}");
    }
}

#[test]
fn auto_mode_follows_the_library_version() {
    let db = open(ReturningMode::Auto);
    assert_eq!(
        db.supports_returning(),
        rusqlite::version_number() >= 3_035_000
    );
    let mut q = question("only", 1);
    q.add(&db, &["id"]).unwrap();
    assert_eq!(q.id, 1);
}

#[test]
fn column_defaults_are_read_back() {
    for mode in [ReturningMode::Native, ReturningMode::Emulate] {
        let db = open(mode);
        let mut score = Score {
            quiz: "math".into(),
            player: "ann".into(),
            points: 99,
        };
        assert!(score.add(&db, &["points"]).unwrap());
        assert_eq!(score.points, 0, "{mode:?}");
    }
}

#[test]
fn get_by_composite_identity() {
    let db = open(ReturningMode::Auto);
    let mut score = Score {
        quiz: "math".into(),
        player: "ann".into(),
        points: 7,
    };
    score.add(&db, &[]).unwrap();

    let found = Score::get(&db, &params!("player" => "ann", "quiz" => "math")).unwrap();
    assert_eq!(found, Some(score));

    let missing = Score::get(&db, &params!("quiz" => "math", "player" => "bob")).unwrap();
    assert_eq!(missing, None);
}

#[test]
fn get_rejects_mismatched_ids() {
    let db = open(ReturningMode::Auto);
    let err = Score::get(&db, &params!("quiz" => "math")).unwrap_err();
    assert!(err.is_contract_violation());
    match err {
        OrmError::IdMismatch {
            table,
            expected,
            given,
        } => {
            assert_eq!(table, "scores");
            assert_eq!(expected, ["player", "quiz"]);
            assert_eq!(given, ["quiz"]);
        }
        other => panic!("unexpected error: {other}"),
    }

    let err = Question::get(&db, &params!("id" => 1i64, "text" => "x")).unwrap_err();
    assert!(matches!(err, OrmError::IdMismatch { .. }));
}

#[test]
fn require_reports_not_found() {
    let db = open(ReturningMode::Auto);
    let err = Question::require(&db, &params!("id" => 42i64)).unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "Not found: questions id=42");
}

#[test]
fn save_updates_everything_but_the_identity() {
    let db = open(ReturningMode::Auto);
    let mut q = seed(&db).remove(1);
    q.text = "edited".into();
    q.image = Some("cat.png".into());
    assert!(q.save(&db).unwrap());

    let stored = Question::require(&db, &params!("id" => q.id)).unwrap();
    assert_eq!(stored, q);

    let rows = db
        .query("SELECT image_url FROM questions WHERE id = :id", &params!("id" => q.id))
        .unwrap();
    assert_eq!(rows.scalar(), Some(&Value::Text("cat.png".into())));
}

#[test]
fn save_of_a_missing_row_changes_nothing() {
    let db = open(ReturningMode::Auto);
    let ghost = Question {
        id: 77,
        ..question("ghost", 9)
    };
    assert!(!ghost.save(&db).unwrap());
}

#[test]
fn delete_removes_one_row() {
    let db = open(ReturningMode::Auto);
    let added = seed(&db);
    assert!(added[0].delete(&db).unwrap());
    assert!(!added[0].delete(&db).unwrap());
    assert_eq!(Question::count(&db, None, &Params::new()).unwrap(), 2);
}

#[test]
fn list_filters_and_orders() {
    let db = open(ReturningMode::Auto);
    seed(&db);

    let texts = |list: Vec<Question>| list.into_iter().map(|q| q.text).collect::<Vec<_>>();

    let all = Question::list(&db, None, Some(Order::desc("position")), &Params::new()).unwrap();
    assert_eq!(texts(all), ["third", "second", "first"]);

    let later = Question::list(
        &db,
        Some("position > :min"),
        Some(Order::asc("position")),
        &params!("min" => 1i64),
    )
    .unwrap();
    assert_eq!(texts(later), ["second", "third"]);

    assert_eq!(
        Question::count(&db, Some("position > :min"), &params!("min" => 2i64)).unwrap(),
        1
    );
}

#[test]
fn delete_all_and_recreate() {
    let db = open(ReturningMode::Auto);
    seed(&db);
    assert_eq!(Question::delete_all(&db).unwrap(), 3);
    assert_eq!(Question::count(&db, None, &Params::new()).unwrap(), 0);

    seed(&db);
    db.recreate::<Question>().unwrap();
    assert_eq!(Question::count(&db, None, &Params::new()).unwrap(), 0);

    // A recreated table restarts its autoincrement sequence.
    let mut q = question("again", 1);
    q.add(&db, &["id"]).unwrap();
    assert_eq!(q.id, 1);
}

#[test]
fn positions_shift_with_a_raw_update() {
    let db = open(ReturningMode::Auto);
    seed(&db);

    let shifted = db
        .execute(
            "UPDATE questions SET position = position + 1 WHERE position >= :position",
            &params!("position" => 2i64),
        )
        .unwrap();
    assert_eq!(shifted, 2);

    let mut inserted = question("inserted", 2);
    inserted.add(&db, &["id"]).unwrap();

    let order = Question::list(&db, None, Some(Order::asc("position")), &Params::new()).unwrap();
    let positions: Vec<(String, i64)> = order.into_iter().map(|q| (q.text, q.position)).collect();
    assert_eq!(
        positions,
        [
            ("first".to_string(), 1),
            ("inserted".to_string(), 2),
            ("second".to_string(), 3),
            ("third".to_string(), 4),
        ]
    );
}

#[test]
fn fetch_with_builders() {
    let db = open(ReturningMode::Auto);
    seed(&db);

    let sql = Select::new()
        .columns(["id", "text", "position", "image_url"])
        .from_table("questions")
        .where_("text = :text")
        .build()
        .unwrap();
    let q: Option<Question> = db.fetch_one(&sql, &params!("text" => "second")).unwrap();
    assert_eq!(q.map(|q| q.position), Some(2));

    let changed = Update::new("questions")
        .set("image_url", raw_sql("'x.png'"))
        .where_("position < :p")
        .execute(&db, &params!("p" => 3i64))
        .unwrap();
    assert_eq!(changed, 2);
}

#[test]
fn unknown_columns_fail_row_binding() {
    let db = open(ReturningMode::Auto);
    seed(&db);
    let err = db
        .fetch_many::<Question>("SELECT id, 1 AS extra FROM questions", &Params::new())
        .unwrap_err();
    assert!(err.is_lookup());
}

#[test]
fn unregistered_models_are_unknown_tables() {
    #[derive(Default)]
    struct Stray;

    impl Model for Stray {
        fn table_def() -> TableDef {
            TableDef::new().column(Column::of::<i64>("id"))
        }

        fn field(&self, name: &str) -> OrmResult<Value> {
            Err(OrmError::unknown_field("Stray", name))
        }

        fn set_field(&mut self, name: &str, _value: Value) -> OrmResult<()> {
            Err(OrmError::unknown_field("Stray", name))
        }
    }

    let db = Database::memory().unwrap();
    let err = Stray::count(&db, None, &Params::new()).unwrap_err();
    assert!(matches!(err, OrmError::UnknownTable(_)));
}

#[test]
fn missing_parameters_are_build_errors() {
    let db = open(ReturningMode::Auto);
    let err = db
        .query("SELECT * FROM questions WHERE id = :id", &Params::new())
        .unwrap_err();
    assert!(matches!(err, OrmError::Build(_)));
}

#[test]
fn traced_statements_still_run() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();

    let hook = TracingSqlHook::new()
        .level(tracing::Level::INFO)
        .max_sql_length(16)
        .log_values(true)
        .redact("text");
    let db = Database::open(
        DatabaseConfig::memory()
            .auto_create_tables(true)
            .trace_hook(hook),
    )
    .unwrap();
    db.register::<Question>().unwrap();
    seed(&db);
    assert_eq!(Question::count(&db, None, &Params::new()).unwrap(), 3);
}

mod first {
    use super::*;

    #[derive(Debug, Default)]
    pub struct Item {
        pub id: i64,
        pub name: String,
    }

    impl Model for Item {
        fn table_def() -> TableDef {
            TableDef::new()
                .column(Column::of::<i64>("id").constraint(ColumnConstraint::primary()))
                .column(Column::of::<String>("name"))
        }

        model_fields!(Item { id, name });
    }
}

mod second {
    use super::*;

    #[derive(Debug, Default)]
    pub struct Item {
        pub code: String,
        pub qty: i64,
    }

    impl Model for Item {
        fn table_def() -> TableDef {
            TableDef::new()
                .column(Column::of::<String>("code").constraint(ColumnConstraint::primary()))
                .column(Column::of::<i64>("qty"))
        }

        model_fields!(Item { code, qty });
    }
}

#[test]
fn two_models_cannot_share_a_table_name() {
    let db = Database::open(DatabaseConfig::memory().auto_create_tables(true)).unwrap();
    let table = db.register::<first::Item>().unwrap();
    assert_eq!(table.name(), "Item");

    let err = db.register::<second::Item>().unwrap_err();
    assert!(matches!(err, OrmError::DuplicateTable { ref table, .. } if table == "Item"));
    assert!(err.is_contract_violation());

    // The first binding is untouched.
    let first_table = db.table_of::<first::Item>().unwrap();
    let columns: Vec<&str> = first_table
        .columns()
        .map(Column::name)
        .collect();
    assert_eq!(columns, ["id", "name"]);
    assert!(matches!(
        db.table_of::<second::Item>(),
        Err(OrmError::UnknownTable(_))
    ));

    let mut item = first::Item {
        id: 1,
        name: "lamp".into(),
    };
    assert!(item.add(&db, &[]).unwrap());
    assert_eq!(db.register::<first::Item>().unwrap().name(), "Item");
}

#[test]
fn concurrent_emulated_adds_keep_their_own_ids() {
    let db = Arc::new(open(ReturningMode::Emulate));
    assert!(!db.supports_returning());

    let workers: Vec<_> = (0..8)
        .map(|worker| {
            let db = Arc::clone(&db);
            thread::spawn(move || {
                (0..50)
                    .map(|n| {
                        let mut q = question(&format!("w{worker}-q{n}"), worker * 100 + n);
                        assert!(q.add(&db, &["id"]).unwrap());
                        q
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let added: Vec<Question> = workers
        .into_iter()
        .flat_map(|worker| worker.join().unwrap())
        .collect();
    assert_eq!(added.len(), 400);

    let ids: HashSet<i64> = added.iter().map(|q| q.id).collect();
    assert_eq!(ids.len(), 400);

    for q in &added {
        let stored = Question::get(&db, &params!("id" => q.id)).unwrap().unwrap();
        assert_eq!(&stored, q);
    }
}
