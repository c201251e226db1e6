use super::*;

#[test]
fn direction_frames_are_bare_ordinals() {
    let table = ProtocolTable::default();
    let frames: Vec<String> = Direction::ALL
        .iter()
        .map(|direction| table.encode(&Command::Move(*direction)))
        .collect();
    assert_eq!(frames, ["0", "1", "2", "3"]);
}

#[test]
fn vector_frame_pads_each_coordinate_to_four_columns() {
    let table = ProtocolTable::default();
    assert_eq!(
        table.encode(&Command::Vector(Position::new(7, 128))),
        "5;   7; 128"
    );
    assert_eq!(
        table.encode(&Command::Vector(Position::new(255, 0))),
        "5; 255;   0"
    );
}

#[test]
fn current_revision_codes() {
    let table = ProtocolRevision::Current.table();
    assert_eq!(table.encode(&Command::Stop), "4");
    assert_eq!(table.encode(&Command::Display(true)), "6");
    assert_eq!(table.encode(&Command::Display(false)), "7");
    assert_eq!(table.encode(&Command::ShowWord("HOLA".into())), "8;HOLA");
    assert_eq!(table.encode(&Command::AutoWord), "9");
}

#[test]
fn legacy_revision_swaps_display_and_word_codes() {
    let table = ProtocolRevision::Legacy.table();
    assert_eq!(table.encode(&Command::Display(true)), "8");
    assert_eq!(table.encode(&Command::Display(false)), "9");
    assert_eq!(table.encode(&Command::ShowWord("ab".into())), "6;ab");
    assert_eq!(table.encode(&Command::AutoWord), "7");
}

#[test]
fn both_revisions_validate() {
    ProtocolRevision::Current
        .table()
        .validate()
        .expect("current table");
    ProtocolRevision::Legacy
        .table()
        .validate()
        .expect("legacy table");
}

#[test]
fn validate_rejects_duplicate_bare_codes() {
    let table = ProtocolTable {
        display_off: 6,
        ..ProtocolTable::default()
    };
    assert_eq!(
        table.validate(),
        Err(ProtocolTableError::DuplicateCode {
            code: 6,
            first: "display_on",
            second: "display_off",
        })
    );
}

#[test]
fn validate_rejects_codes_shadowing_directions() {
    let table = ProtocolTable {
        stop: 2,
        ..ProtocolTable::default()
    };
    assert_eq!(
        table.validate(),
        Err(ProtocolTableError::DirectionCollision {
            code: 2,
            command: "stop",
        })
    );
}

#[test]
fn decode_reads_back_every_command_shape() {
    let table = ProtocolTable::default();
    assert_eq!(table.decode("2"), Ok(Command::Move(Direction::Left)));
    assert_eq!(table.decode("4"), Ok(Command::Stop));
    assert_eq!(
        table.decode("5;  20; 255"),
        Ok(Command::Vector(Position::new(20, 255)))
    );
    assert_eq!(table.decode("7"), Ok(Command::Display(false)));
    assert_eq!(table.decode("8;a;b"), Ok(Command::ShowWord("a;b".into())));
    assert_eq!(table.decode("8;"), Ok(Command::ShowWord(String::new())));
    assert_eq!(table.decode("9"), Ok(Command::AutoWord));
}

#[test]
fn decode_rejects_malformed_frames() {
    let table = ProtocolTable::default();
    assert_eq!(table.decode(""), Err(FrameError::Empty));
    assert_eq!(
        table.decode("42"),
        Err(FrameError::UnknownCode("42".into()))
    );
    assert_eq!(
        table.decode("x"),
        Err(FrameError::UnknownCode("x".into()))
    );
    assert_eq!(table.decode("8"), Err(FrameError::MissingPayload { code: 8 }));
    assert_eq!(
        table.decode("4;now"),
        Err(FrameError::UnexpectedPayload { code: 4 })
    );
    assert_eq!(table.decode("5;   1"), Err(FrameError::VectorArity(1)));
    assert_eq!(
        table.decode("5; 300;   0"),
        Err(FrameError::InvalidVectorField {
            field: " 300".into()
        })
    );
}

#[test]
fn bare_code_may_reuse_a_payload_code() {
    let table = ProtocolTable {
        auto_word: 8,
        display_off: 5,
        ..ProtocolTable::default()
    };
    assert_eq!(table.validate(), Ok(()));

    for command in [
        Command::AutoWord,
        Command::Display(false),
        Command::ShowWord("HOLA".into()),
        Command::Vector(Position::new(7, 250)),
    ] {
        let frame = table.encode(&command);
        assert_eq!(table.decode(&frame), Ok(command), "frame {frame:?}");
    }
    assert_eq!(table.encode(&Command::AutoWord), "8");
    assert_eq!(
        table.decode("7;x"),
        Err(FrameError::UnknownCode("7".into()))
    );
}

#[test]
fn table_overrides_deserialize_on_top_of_current_revision() {
    let table: ProtocolTable =
        toml::from_str("display_on = 8\ndisplay_off = 9\nshow_word = 6\nauto_word = 7\n")
            .expect("parse table");
    assert_eq!(table, ProtocolRevision::Legacy.table());

    let partial: ProtocolTable = toml::from_str("stop = 44").expect("parse partial");
    assert_eq!(partial.stop, 44);
    assert_eq!(partial.vector, 5);
}

#[test]
fn revision_parses_case_insensitively() {
    assert_eq!("Legacy".parse::<ProtocolRevision>(), Ok(ProtocolRevision::Legacy));
    assert_eq!("current".parse::<ProtocolRevision>(), Ok(ProtocolRevision::Current));
    assert!("v3".parse::<ProtocolRevision>().is_err());
}

#[test]
fn normalized_axes_round_and_clamp() {
    assert_eq!(Position::from_normalized(0.05, 0.5), Position::new(13, 128));
    assert_eq!(Position::from_normalized(1.0, 3.2), Position::new(255, 255));
    assert_eq!(Position::from_normalized(-0.4, -1.0), Position::new(0, 0));
    assert_eq!(Position::from_normalized(f64::NAN, 0.0), Position::ORIGIN);
}

#[test]
fn deadband_threshold_is_inclusive() {
    let last = Position::new(100, 100);
    assert!(!Position::new(119, 100).exceeds_deadband(last, 20));
    assert!(Position::new(120, 100).exceeds_deadband(last, 20));
    assert!(Position::new(80, 100).exceeds_deadband(last, 20));
    assert!(!Position::new(81, 119).exceeds_deadband(last, 20));
    assert!(Position::new(100, 120).exceeds_deadband(last, 20));
}

#[test]
fn direction_round_trips_through_code_and_name() {
    for direction in Direction::ALL {
        assert_eq!(Direction::from_code(direction.code()), Some(direction));
        assert_eq!(direction.as_str().parse::<Direction>(), Ok(direction));
    }
    assert_eq!(Direction::from_code(4), None);
}
