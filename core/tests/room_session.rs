use empirio_core::player::PlayerId;
use empirio_core::power::{PowerMeter, POWER_CAP};
use empirio_core::protocol::{
    ClientPacket, ServerPlayerJoin, ServerPlayerLost, ServerStart, ServerTileChange,
};
use empirio_core::room::{PlayerProfile, Room, RoomPhase, StartError, TileChangeError};
use empirio_core::tile::TileKind;

fn start_packet(width: i32, height: i32) -> ServerStart {
    ServerStart {
        room: 5,
        width,
        height,
        player_id: "p1".to_string(),
    }
}

fn profile() -> PlayerProfile {
    PlayerProfile {
        name: "ada".to_string(),
        colour: "ff0000".to_string(),
    }
}

fn join(id: &str) -> ServerPlayerJoin {
    ServerPlayerJoin {
        id: id.to_string(),
        name: format!("{id}-name"),
        colour: "00ff00".to_string(),
    }
}

fn change(x: i32, y: i32, owner: &str, strength: u32, tile_type: u8) -> ServerTileChange {
    ServerTileChange {
        x,
        y,
        owner: owner.to_string(),
        strength,
        tile_type,
    }
}

fn new_room(now_ms: f64) -> Room {
    Room::new(&start_packet(3, 3), &profile(), now_ms).unwrap()
}

fn assert_zero_strength_invariant(room: &Room) {
    for tile in room.field().tiles() {
        let zero = tile.strength() == 0;
        assert_eq!(zero, tile.owner().is_none());
        assert_eq!(zero, tile.kind() == TileKind::Unowned);
    }
}

#[test]
fn power_is_the_square_of_elapsed_seconds() {
    let meter = PowerMeter::new(0.0);
    assert_eq!(meter.level(0.0), 0);
    assert_eq!(meter.level(1000.0), 1);
    assert_eq!(meter.level(2000.0), 4);
    assert_eq!(meter.level(2500.0), 6);
    assert_eq!(meter.level(31_600.0), 998);
    assert_eq!(meter.level(31_700.0), POWER_CAP);
    assert_eq!(meter.level(3_600_000.0), POWER_CAP);
}

#[test]
fn power_never_decreases_until_reset() {
    let meter = PowerMeter::new(500.0);
    let mut last = 0;
    for step in 0..200 {
        let level = meter.level(500.0 + step as f64 * 173.0);
        assert!(level >= last);
        last = level;
    }
}

#[test]
fn resetting_the_baseline_zeroes_the_level() {
    let mut meter = PowerMeter::new(0.0);
    assert_eq!(meter.level(5000.0), 25);
    meter.reset(5000.0);
    assert_eq!(meter.level(5000.0), 0);
}

#[test]
fn clock_going_backwards_reads_zero() {
    let meter = PowerMeter::new(10_000.0);
    assert_eq!(meter.level(8000.0), 0);
}

#[test]
fn start_registers_the_local_player() {
    let room = new_room(0.0);
    assert_eq!(room.room_number(), 5);
    assert_eq!(room.field().width(), 3);
    assert_eq!(room.field().height(), 3);
    assert_eq!(room.phase(), RoomPhase::Playing);
    assert_eq!(room.players().len(), 1);
    let local = room.players().get(room.self_id()).unwrap();
    assert_eq!(local.name, "ada");
    assert_eq!(local.colour, "ff0000");
}

#[test]
fn start_with_unusable_dimensions_is_rejected() {
    assert_eq!(
        Room::new(&start_packet(0, 3), &profile(), 0.0).unwrap_err(),
        StartError::InvalidDimensions { width: 0, height: 3 }
    );
    assert!(Room::new(&start_packet(3, -1), &profile(), 0.0).is_err());
}

#[test]
fn full_session_scenario() {
    let mut room = new_room(0.0);

    let refresh = room
        .handle_tile_change(change(1, 1, "p1", 4, 1))
        .unwrap();
    assert_eq!((refresh.x, refresh.y), (1, 1));
    assert_eq!(refresh.strength, 4);
    assert_eq!(refresh.kind, TileKind::Owned);
    assert_eq!(refresh.owner_colour.as_deref(), Some("ff0000"));

    let tile = room.field().get(1, 1).unwrap();
    assert_eq!(tile.owner(), Some(&PlayerId::new("p1")));
    assert_eq!(tile.strength(), 4);
    assert_eq!(tile.kind(), TileKind::Owned);
    assert_zero_strength_invariant(&room);

    assert!(room.handle_player_lost(ServerPlayerLost {
        player: "p1".to_string(),
    }));
    assert_eq!(room.phase(), RoomPhase::Lost);
    assert_eq!(room.tick(10_000.0), None);
}

#[test]
fn tile_change_for_a_ghost_owner_leaves_the_tile_alone() {
    let mut room = new_room(0.0);
    room.handle_tile_change(change(1, 1, "p1", 4, 1)).unwrap();

    let err = room
        .handle_tile_change(change(1, 1, "ghost", 9, 2))
        .unwrap_err();
    assert_eq!(err, TileChangeError::UnknownOwner(PlayerId::new("ghost")));

    let tile = room.field().get(1, 1).unwrap();
    assert_eq!(tile.owner(), Some(&PlayerId::new("p1")));
    assert_eq!(tile.strength(), 4);
    assert_eq!(tile.kind(), TileKind::Owned);
}

#[test]
fn out_of_bounds_tile_change_is_dropped() {
    let mut room = new_room(0.0);
    assert_eq!(
        room.handle_tile_change(change(3, 0, "p1", 1, 1)).unwrap_err(),
        TileChangeError::OutOfBounds { x: 3, y: 0 }
    );
    assert_eq!(
        room.handle_tile_change(change(0, -1, "p1", 1, 1)).unwrap_err(),
        TileChangeError::OutOfBounds { x: 0, y: -1 }
    );
    assert_zero_strength_invariant(&room);
}

#[test]
fn unknown_tile_type_code_is_dropped() {
    let mut room = new_room(0.0);
    assert_eq!(
        room.handle_tile_change(change(0, 0, "p1", 1, 7)).unwrap_err(),
        TileChangeError::UnknownKindCode(7)
    );
}

#[test]
fn strength_and_kind_must_agree() {
    let mut room = new_room(0.0);
    assert!(matches!(
        room.handle_tile_change(change(0, 0, "p1", 0, 1)),
        Err(TileChangeError::StrengthKindMismatch { .. })
    ));
    assert!(matches!(
        room.handle_tile_change(change(0, 0, "p1", 3, 0)),
        Err(TileChangeError::StrengthKindMismatch { .. })
    ));
    assert_zero_strength_invariant(&room);
}

#[test]
fn zero_strength_clears_ownership() {
    let mut room = new_room(0.0);
    room.handle_tile_change(change(2, 2, "p1", 8, 2)).unwrap();
    assert_eq!(room.field().get(2, 2).unwrap().kind(), TileKind::Capital);

    let refresh = room.handle_tile_change(change(2, 2, "p1", 0, 0)).unwrap();
    assert_eq!(refresh.owner_colour, None);
    assert_eq!(refresh.owner_name, None);

    let tile = room.field().get(2, 2).unwrap();
    assert_eq!(tile.owner(), None);
    assert_eq!(tile.strength(), 0);
    assert_eq!(tile.kind(), TileKind::Unowned);
    assert_zero_strength_invariant(&room);
}

#[test]
fn join_is_idempotent() {
    let mut room = new_room(0.0);
    assert!(room.handle_player_join(join("p2")));
    assert_eq!(room.players().len(), 2);

    let duplicate = ServerPlayerJoin {
        id: "p2".to_string(),
        name: "imposter".to_string(),
        colour: "0000ff".to_string(),
    };
    assert!(!room.handle_player_join(duplicate));
    assert_eq!(room.players().len(), 2);
    let kept = room.players().get(&PlayerId::new("p2")).unwrap();
    assert_eq!(kept.name, "p2-name");
}

#[test]
fn tile_change_works_for_a_player_joined_earlier_in_the_stream() {
    let mut room = new_room(0.0);
    room.handle_player_join(join("p2"));
    let refresh = room.handle_tile_change(change(0, 2, "p2", 2, 1)).unwrap();
    assert_eq!(refresh.owner_colour.as_deref(), Some("00ff00"));
    assert_eq!(refresh.owner_name.as_deref(), Some("p2-name"));
}

#[test]
fn clicks_need_accrued_power() {
    let mut room = new_room(0.0);
    room.handle_tile_change(change(1, 1, "p1", 4, 1)).unwrap();
    // No time has passed since room start.
    assert_eq!(room.tile_clicked(1, 1, 0.0), None);
    assert!(room.tile_clicked(1, 1, 3000.0).is_some());
}

#[test]
fn clicks_need_an_owned_or_adjacent_tile() {
    let mut room = new_room(0.0);
    room.handle_tile_change(change(1, 1, "p1", 4, 1)).unwrap();

    assert!(room.can_attack(1, 1, 3000.0));
    assert!(room.can_attack(0, 1, 3000.0));
    assert!(room.can_attack(2, 1, 3000.0));
    assert!(room.can_attack(1, 0, 3000.0));
    assert!(room.can_attack(1, 2, 3000.0));
    // Diagonal and detached tiles are out of reach.
    assert!(!room.can_attack(0, 0, 3000.0));
    assert!(!room.can_attack(2, 2, 3000.0));
    assert_eq!(room.tile_clicked(0, 0, 3000.0), None);
}

#[test]
fn adjacency_probes_stay_inside_the_field() {
    let mut room = new_room(0.0);
    room.handle_tile_change(change(0, 0, "p1", 4, 1)).unwrap();
    assert!(room.can_attack(0, 0, 3000.0));
    assert!(room.can_attack(1, 0, 3000.0));
    assert!(room.can_attack(0, 1, 3000.0));
}

#[test]
fn a_sent_click_spends_the_power() {
    let mut room = new_room(0.0);
    room.handle_tile_change(change(1, 1, "p1", 4, 1)).unwrap();

    let packet = room.tile_clicked(2, 1, 4000.0).unwrap();
    assert_eq!(packet, ClientPacket::Click { x: 2, y: 1 });
    assert_eq!(room.power_level(4000.0), 0);
    // Immediately clicking again finds the meter empty.
    assert_eq!(room.tile_clicked(2, 1, 4000.0), None);
    assert_eq!(room.tick(4500.0), Some(0));
}

#[test]
fn a_rejected_click_does_not_spend_the_power() {
    let mut room = new_room(0.0);
    room.handle_tile_change(change(1, 1, "p1", 4, 1)).unwrap();
    assert_eq!(room.tile_clicked(0, 0, 4000.0), None);
    assert_eq!(room.power_level(4000.0), 16);
}

#[test]
fn no_clicks_after_losing() {
    let mut room = new_room(0.0);
    room.handle_tile_change(change(1, 1, "p1", 4, 1)).unwrap();
    room.handle_player_lost(ServerPlayerLost {
        player: "p1".to_string(),
    });
    assert_eq!(room.tile_clicked(1, 1, 60_000.0), None);
}

#[test]
fn other_players_losing_changes_nothing() {
    let mut room = new_room(0.0);
    room.handle_player_join(join("p2"));
    assert!(!room.handle_player_lost(ServerPlayerLost {
        player: "p2".to_string(),
    }));
    assert_eq!(room.phase(), RoomPhase::Playing);
    assert_eq!(room.tick(2000.0), Some(4));
}

#[test]
fn panning_accumulates_without_clamping() {
    let mut room = new_room(0.0);
    room.pan(12.5, -3.0);
    room.pan(-40.0, 9.5);
    assert_eq!(room.field().view_offset(), (-27.5, 6.5));
    room.pan(-1.0e6, 1.0e6);
    assert_eq!(room.field().view_offset(), (-1_000_027.5, 1_000_006.5));
}
