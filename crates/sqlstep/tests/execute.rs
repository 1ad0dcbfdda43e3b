use sqlstep::{Bind, BindBatch, BindTuple, Binding, Encode, ExtractAll, ExtractRow, Value};
use sqlstep_test::tdb;

fn setup_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn it_inserts_a_batch() -> anyhow::Result<()> {
    setup_logging();
    let conn = tdb()?;

    let names = ["ada", "brian", "grace", "linus"];
    let mut batch = BindBatch::new(names);
    let mut insert = conn.statement("INSERT INTO accounts (name) VALUES (?)");
    let rows = insert.execute(&mut [&mut batch], &mut [])?;
    assert_eq!(rows, 0);
    assert_eq!(batch.remaining(), 0);
    assert_eq!(insert.rows_affected(), 1);
    assert_eq!(conn.last_insert_rowid(), 4);

    let mut stored: Vec<String> = Vec::new();
    let rows = conn
        .statement("SELECT name FROM accounts ORDER BY id")
        .execute(&mut [], &mut [&mut ExtractAll::new(&mut stored)])?;
    assert_eq!(rows, 4);
    assert_eq!(stored, names);
    Ok(())
}

#[test]
fn it_runs_a_batch_again_after_reset() -> anyhow::Result<()> {
    let conn = tdb()?;
    let mut batch = BindBatch::new([1.5f64, 2.5]);
    let mut insert = conn.statement("INSERT INTO accounts (name, balance) VALUES ('x', ?)");

    insert.execute(&mut [&mut batch], &mut [])?;
    insert.execute(&mut [&mut batch], &mut [])?;

    let mut balances: Vec<f64> = Vec::new();
    conn.statement("SELECT balance FROM accounts ORDER BY id")
        .execute(&mut [], &mut [&mut ExtractAll::new(&mut balances)])?;
    assert_eq!(balances, vec![1.5, 2.5, 1.5, 2.5]);
    Ok(())
}

#[test]
fn it_skips_an_empty_batch() -> anyhow::Result<()> {
    let conn = tdb()?;
    let mut batch = BindBatch::new(Vec::<String>::new());
    let mut insert = conn.statement("INSERT INTO accounts (name) VALUES (?)");
    assert_eq!(insert.execute(&mut [&mut batch], &mut [])?, 0);

    let mut count: Vec<i64> = Vec::new();
    conn.statement("SELECT COUNT(*) FROM accounts")
        .execute(&mut [], &mut [&mut ExtractAll::new(&mut count)])?;
    assert_eq!(count, vec![0]);
    Ok(())
}

#[test]
fn it_inserts_pairs_from_parallel_batches() -> anyhow::Result<()> {
    let conn = tdb()?;
    let mut names = BindBatch::new(["a", "b", "c"]);
    let mut balances = BindBatch::new([10i32, 20, 30]);
    conn.statement("INSERT INTO accounts (name, balance) VALUES (?, ?)")
        .execute(&mut [&mut names, &mut balances], &mut [])?;

    let mut rows = Vec::new();
    conn.statement("SELECT name, balance FROM accounts ORDER BY id")
        .execute(&mut [], &mut [&mut ExtractRow::new(&mut rows, 2)])?;
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[2][0].text()?, "c");
    assert_eq!(rows[2][1].double()?, 30.0);
    Ok(())
}

#[test]
fn it_extracts_nullable_columns() -> anyhow::Result<()> {
    let conn = tdb()?;
    let mut owners: Vec<Option<i64>> = Vec::new();
    let mut sent: Vec<bool> = Vec::new();
    conn.statement("SELECT owner_id, is_sent FROM tweet ORDER BY id")
        .execute(
            &mut [],
            &mut [&mut ExtractAll::new(&mut owners), &mut ExtractAll::new(&mut sent)],
        )?;
    assert_eq!(owners, vec![Some(10), None]);
    assert_eq!(sent, vec![true, false]);
    Ok(())
}

#[test]
fn it_round_trips_blobs() -> anyhow::Result<()> {
    let conn = tdb()?;
    let avatar: Vec<u8> = (0..=255).collect();

    let mut tuple = BindTuple::new(vec!["blobby".encode(), avatar.clone().encode()]);
    conn.statement("INSERT INTO accounts (name, avatar) VALUES (?, ?)")
        .execute(&mut [&mut tuple], &mut [])?;
    assert!(!tuple.can_bind());

    let mut stored: Vec<Vec<u8>> = Vec::new();
    conn.statement("SELECT avatar FROM accounts WHERE name = ?")
        .execute(
            &mut [&mut Bind::new("blobby")],
            &mut [&mut ExtractAll::new(&mut stored)],
        )?;
    assert_eq!(stored, vec![avatar]);
    Ok(())
}

#[test]
fn it_binds_invalid_utf8_text_as_a_blob() -> anyhow::Result<()> {
    let conn = tdb()?;
    let bytes = vec![0xff, 0xfe, b'a'];

    let mut rows = Vec::new();
    conn.statement("SELECT typeof(?), ?")
        .execute(
            &mut [&mut BindTuple::new(vec![
                Value::Text(bytes.clone(), None),
                Value::Text(bytes.clone(), None),
            ])],
            &mut [&mut ExtractRow::new(&mut rows, 2)],
        )?;
    assert_eq!(rows[0][0].text()?, "blob");
    assert_eq!(rows[0][1].blob(), bytes.as_slice());
    Ok(())
}
