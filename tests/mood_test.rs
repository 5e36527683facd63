use moodlist::mood::{Mood, mood_table_rows};

#[test]
fn test_parse_moods_case_insensitive() {
    assert_eq!("rainy".parse::<Mood>(), Ok(Mood::Rainy));
    assert_eq!("Workout".parse::<Mood>(), Ok(Mood::Workout));
    assert_eq!(" FOCUS ".parse::<Mood>(), Ok(Mood::Focus));
}

#[test]
fn test_parse_unknown_mood() {
    assert!("gloomy".parse::<Mood>().is_err());
    assert!("".parse::<Mood>().is_err());
    // resolved by the weather lookup, never a catalogue entry
    assert!("weather".parse::<Mood>().is_err());
}

#[test]
fn test_weather_mapping() {
    assert_eq!(Mood::for_weather("Rain"), Mood::Rainy);
    assert_eq!(Mood::for_weather("Drizzle"), Mood::Rainy);
    assert_eq!(Mood::for_weather("Clear"), Mood::Summer);
    assert_eq!(Mood::for_weather("Snow"), Mood::Winter);
    assert_eq!(Mood::for_weather("Clouds"), Mood::Spring);
    assert_eq!(Mood::for_weather("Thunderstorm"), Mood::Summer);
    assert_eq!(Mood::for_weather("Mist"), Mood::Summer);
}

#[test]
fn test_catalogue_entries() {
    assert_eq!(Mood::Rainy.playlist_name(), "Rainy Day Chill");
    assert_eq!(
        Mood::Winter.queries(),
        &["genre:\"lo-fi\"", "genre:ambient", "genre:study"]
    );
    assert_eq!(
        Mood::Party.description(),
        "A playlist for a party mood, generated via search."
    );

    for mood in Mood::ALL {
        assert!(!mood.queries().is_empty());
        assert_eq!(mood.as_str().parse::<Mood>(), Ok(mood));
    }
}

#[test]
fn test_mood_table_rows() {
    let rows = mood_table_rows();
    assert_eq!(rows.len(), Mood::ALL.len());
    assert_eq!(rows[0].mood, "rainy");
    assert_eq!(rows[0].playlist, "Rainy Day Chill");
    assert!(rows[0].queries.contains("genre:acoustic"));
}
