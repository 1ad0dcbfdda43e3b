use sqlstep::{
    Bind, Binder, Binding, Error, Extract, ExtendedErrCode, PrimaryErrCode, Result, Statement,
};
use sqlstep_test::tdb;

fn run(stmt: &mut Statement<'_>) -> Result<()> {
    stmt.compile()?;
    stmt.bind(&mut [])?;
    while stmt.has_next()? {
        stmt.next(&mut [])?;
    }
    Ok(())
}

#[test]
fn it_fails_with_unique_violation() -> anyhow::Result<()> {
    let conn = tdb()?;
    let mut stmt = conn.statement("INSERT INTO tweet VALUES (1, 'Foo', true, 1);");

    let err = run(&mut stmt).unwrap_err();
    let err = err.into_sqlite_error().unwrap();

    assert_eq!(err.primary, PrimaryErrCode::Constraint);
    assert_eq!(err.extended, ExtendedErrCode::ConstraintPrimaryKey);

    Ok(())
}

#[test]
fn it_fails_with_foreign_key_violation() -> anyhow::Result<()> {
    let conn = tdb()?;
    let mut stmt =
        conn.statement("INSERT INTO tweet_reply (id, tweet_id, text) VALUES (2, 99, 'Reply!');");

    let err = run(&mut stmt).unwrap_err();
    let err = err.into_sqlite_error().unwrap();

    assert_eq!(err.primary, PrimaryErrCode::Constraint);
    assert_eq!(err.extended, ExtendedErrCode::ConstraintForeignKey);

    Ok(())
}

#[test]
fn it_fails_with_not_null_violation() -> anyhow::Result<()> {
    let conn = tdb()?;
    let mut stmt = conn.statement("INSERT INTO tweet (text) VALUES (?);");
    stmt.compile()?;
    stmt.bind(&mut [&mut Bind::new(Option::<String>::None)])?;

    let err = stmt.has_next().unwrap_err();
    let err = err.into_sqlite_error().unwrap();

    assert_eq!(err.primary, PrimaryErrCode::Constraint);
    assert_eq!(err.extended, ExtendedErrCode::ConstraintNotNull);

    Ok(())
}

#[test]
fn it_fails_with_check_violation() -> anyhow::Result<()> {
    let conn = tdb()?;
    let mut stmt = conn.statement("INSERT INTO products VALUES (1, 'Product 1', 0);");

    let err = run(&mut stmt).unwrap_err();
    let err = err.into_sqlite_error().unwrap();

    assert_eq!(err.primary, PrimaryErrCode::Constraint);
    assert_eq!(err.extended, ExtendedErrCode::ConstraintCheck);

    Ok(())
}

#[test]
fn it_keeps_the_error_until_rebound() -> anyhow::Result<()> {
    let conn = tdb()?;
    let mut stmt = conn.statement("INSERT INTO tweet (id, text) VALUES (?, 'again')");
    stmt.compile()?;

    stmt.bind(&mut [&mut Bind::new(1i64)])?;
    assert!(stmt.has_next().is_err());

    // The failed step is memoized: no further step, and no row to consume.
    assert!(!stmt.has_next()?);
    let err = stmt.next(&mut []).unwrap_err().into_sqlite_error().unwrap();
    assert_eq!(err.primary, PrimaryErrCode::Constraint);
    assert!(err.message.starts_with("iterator error"));

    // A fresh bind starts over.
    stmt.bind(&mut [&mut Bind::new(3i64)])?;
    assert!(!stmt.has_next()?);
    assert_eq!(stmt.rows_affected(), 1);
    Ok(())
}

/// Binds its value one slot past where it was placed.
struct Misplaced;

impl Binding for Misplaced {
    fn columns_handled(&self) -> usize {
        1
    }

    fn can_bind(&self) -> bool {
        true
    }

    fn bind(&mut self, binder: &mut Binder<'_>, position: usize) -> Result<()> {
        binder.bind_int(position + 1, 7)
    }
}

#[test]
fn it_maps_out_of_range_slots_to_a_count_mismatch() -> anyhow::Result<()> {
    let conn = tdb()?;
    let mut stmt = conn.statement("SELECT text FROM tweet WHERE id = ?");
    stmt.compile()?;

    match stmt.bind(&mut [&mut Misplaced]) {
        Err(Error::ParameterCountMismatch { expected, actual }) => {
            assert_eq!((expected, actual), (1, 2));
        }
        other => panic!("expected a mismatch, got {other:?}"),
    }
    Ok(())
}

#[test]
fn it_reports_decode_failures_by_column() -> anyhow::Result<()> {
    let conn = tdb()?;
    let mut stmt = conn.statement("SELECT id, text FROM tweet WHERE id = 1");
    stmt.compile()?;
    stmt.bind(&mut [])?;
    assert!(stmt.has_next()?);

    let mut id = 0i64;
    let mut text = 0i64;
    let err = stmt
        .next(&mut [&mut Extract::new(&mut id), &mut Extract::new(&mut text)])
        .unwrap_err();
    assert!(matches!(err, Error::ColumnDecode { index: 1, .. }), "{err}");
    Ok(())
}
