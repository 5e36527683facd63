use tabled::Table;

use crate::mood;

pub fn moods() {
    println!("{}", Table::new(mood::mood_table_rows()));
}
