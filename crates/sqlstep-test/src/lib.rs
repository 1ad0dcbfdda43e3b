use sqlstep::Connection;

const TEST_SCHEMA: &str = include_str!("setup.sql");

// Make a new connection
pub fn connection() -> anyhow::Result<Connection> {
    Ok(Connection::open_in_memory()?)
}

/// Return a connection to a database pre-configured with our test schema.
pub fn tdb() -> anyhow::Result<Connection> {
    let conn = connection()?;
    conn.execute_batch(TEST_SCHEMA)?;
    Ok(conn)
}

/// Decode `SELECT <text>` into a single value of type `T`.
pub fn select_one<T: sqlstep::Decode>(conn: &Connection, sql: &str) -> anyhow::Result<T> {
    let mut values: Vec<T> = Vec::new();
    conn.statement(sql)
        .execute(&mut [], &mut [&mut sqlstep::ExtractAll::new(&mut values)])?;
    values
        .pop()
        .ok_or_else(|| anyhow::anyhow!("{sql} returned no rows"))
}

// Test type encoding and decoding
//
// Each case is checked twice: decoded from a SQL literal, and bound as a parameter then
// read back.
#[macro_export]
macro_rules! test_type {
    ($name:ident<$ty:ty>($($text:literal == $value:expr),+ $(,)?)) => {
        mod $name {
            #[test]
            fn literal() -> anyhow::Result<()> {
                let conn = sqlstep_test::connection()?;
                $(
                    let query = format!("SELECT {}", $text);
                    let rec: $ty = sqlstep_test::select_one(&conn, &query)?;
                    assert_eq!($value, rec, "{query}");
                )+
                Ok(())
            }

            #[test]
            fn bound() -> anyhow::Result<()> {
                let conn = sqlstep_test::connection()?;
                $(
                    let value: $ty = $value;
                    let mut out: Vec<$ty> = Vec::new();
                    conn.statement("SELECT ?").execute(
                        &mut [&mut sqlstep::Bind::new(value.clone())],
                        &mut [&mut sqlstep::ExtractAll::new(&mut out)],
                    )?;
                    assert_eq!(vec![value], out);
                )+
                Ok(())
            }
        }
    };

    ($name:ident($($text:literal == $value:expr),+ $(,)?)) => {
        $crate::test_type!($name<$name>($($text == $value),+));
    };
}
