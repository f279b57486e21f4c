//! Collision detector tests - validity, ghost and drop distance

use blockfall::core::{Board, CollisionDetector, Piece, PieceGenerator};
use blockfall::types::{ColorTag, Direction, PieceKind, Rotation, TSpinKind};

const GRAY: Option<ColorTag> = Some(ColorTag(0x808080));

fn setup() -> (CollisionDetector, Board, PieceGenerator) {
    let board = Board::new();
    (
        CollisionDetector::for_board(&board),
        board,
        PieceGenerator::with_seed(3, 10),
    )
}

/// A ragged stack so drops and kicks have something to hit.
fn ragged_board() -> Board {
    let mut board = Board::new();
    let heights = [3, 5, 2, 0, 1, 4, 6, 2, 0, 3];
    for (x, &h) in heights.iter().enumerate() {
        for y in (20 - h)..20 {
            board.set(x as i32, y, GRAY);
        }
    }
    board
}

#[test]
fn test_square_slides_to_left_wall() {
    let (detector, board, _) = setup();
    let mut piece = Piece::spawn(PieceKind::O, 10);

    let mut moves = 0;
    while detector.can_move(&piece, &board, Direction::Left) {
        piece = piece.offset(-1, 0);
        moves += 1;
    }
    assert_eq!(moves, 4);
    assert_eq!(piece.min_x(), 0);
    assert!(!detector.is_valid_position(&piece, &board, -1, 0));
}

#[test]
fn test_rows_above_field_are_valid() {
    let (detector, board, _) = setup();
    let piece = Piece::new(PieceKind::I, 3, -3);
    assert!(detector.is_valid_position(&piece, &board, 0, 0));
    assert!(!detector.is_valid_position(&piece, &board, 0, 19));
}

#[test]
fn test_every_spawn_is_valid_on_empty_board() {
    let (detector, board, mut generator) = setup();
    for _ in 0..14 {
        let piece = generator.get_next_piece();
        assert!(detector.is_valid_position(&piece, &board, 0, 0));
        assert!(!detector.has_landed(&piece, &board));
    }
}

#[test]
fn test_ghost_is_idempotent_and_landed() {
    let (detector, _, generator) = setup();
    let board = ragged_board();

    for kind in PieceKind::ALL {
        for x in -1..9 {
            let piece = generator.spawn(kind).offset(x - 3, 0);
            if !detector.is_valid_position(&piece, &board, 0, 0) {
                continue;
            }
            let ghost = detector.ghost_piece(&piece, &board);
            assert!(detector.is_valid_position(&ghost, &board, 0, 0));
            assert!(detector.has_landed(&ghost, &board));
            assert_eq!(detector.ghost_piece(&ghost, &board), ghost);
            assert_eq!(ghost.x, piece.x);
        }
    }
}

#[test]
fn test_hard_drop_distance_bounded() {
    let (detector, board, generator) = setup();
    for kind in PieceKind::ALL {
        let piece = generator.spawn(kind);
        let distance = detector.hard_drop_distance(&piece, &board);
        assert!(distance <= board.height() as u32);
        let dropped = piece.offset(0, distance as i32);
        assert_eq!(dropped.max_y(), 19, "{:?}", kind);
    }
}

#[test]
fn test_rotation_kicks_off_wall() {
    let (detector, board, generator) = setup();
    // Vertical I hugging the right wall: rotating back to flat needs a kick.
    let vertical = generator.rotate_piece(&Piece::new(PieceKind::I, 5, 5), true);
    assert_eq!(vertical.rotation, Rotation::East);
    let hugging = vertical.offset(2, 0);
    assert!(detector.is_valid_position(&hugging, &board, 0, 0));

    let flat = generator.rotate_piece(&hugging, false);
    assert!(!detector.is_valid_position(&flat, &board, 0, 0));
    let placed = detector
        .can_rotate(&hugging, &board, &flat, &generator)
        .expect("kick should fit");
    assert!(detector.is_valid_position(&placed, &board, 0, 0));
    assert_eq!(placed.rotation, Rotation::North);
}

#[test]
fn test_t_spin_needs_rotation() {
    let (detector, mut board, generator) = setup();
    for x in 0..10 {
        if x != 4 {
            board.set(x, 19, GRAY);
        }
        if !(3..=5).contains(&x) {
            board.set(x, 18, GRAY);
        }
    }
    board.set(3, 17, GRAY);

    let north = Piece::new(PieceKind::T, 3, 17);
    let south = generator.rotate_piece(&generator.rotate_piece(&north, true), true);
    assert!(detector.is_valid_position(&south, &board, 0, 0));

    assert_eq!(detector.t_spin_kind(&south, &board, true), TSpinKind::Full);
    assert!(detector.check_t_spin(&south, &board, true));
    assert_eq!(detector.t_spin_kind(&south, &board, false), TSpinKind::None);
    assert!(!detector.check_t_spin(&south, &board, false));
}
