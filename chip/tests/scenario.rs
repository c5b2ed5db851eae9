use chip::{
    chip8::ChipSet,
    config::{Config, Quirks},
    resources::Rom,
};

/// clear, `V0 = 5`, `I = 0x208`, draw 5 rows at `(V0, V0)`, jump to the start
const ROM_DATA: [u8; 10] = [0x00, 0xE0, 0x60, 0x05, 0xA2, 0x08, 0xD0, 0x05, 0x12, 0x00];

fn get_chip(data: &[u8]) -> ChipSet {
    let rom = Rom::new("scenario", data.to_vec().into_boxed_slice()).expect("rom fits");
    let config = Config {
        seed: Some(7),
        ..Config::default()
    };
    ChipSet::new(rom, &config)
}

#[test]
fn test_sprite_from_program_bytes() {
    let mut chip = get_chip(&ROM_DATA);
    for _ in 0..4 {
        chip.cycle();
    }

    // the first sprite row is 0x12, the jump opcode itself
    let display = chip.get_display();
    assert!(display.pixel(8, 5));
    assert!(display.pixel(11, 5));
    assert_eq!(display.lit(), 2);
    assert_eq!(chip.register(0xF), 0);
}

#[test]
fn test_frames_show_the_sprite() {
    let mut chip = get_chip(&ROM_DATA);
    let cycles = Config::default().cycles_per_frame();

    let mut frames_with_sprite = 0;
    for _ in 0..60 {
        chip.frame(cycles);
        chip.tick_timers();
        if !chip.get_display().is_blank() {
            frames_with_sprite += 1;
            assert!(chip.get_display().pixel(8, 5));
        }
        chip.mark_rendered();
    }
    assert!(frames_with_sprite > 0);
    assert!(chip.program_counter() >= 0x200 && chip.program_counter() < 0x20A);
}

#[test]
fn test_delay_timer_counts_frames() {
    // V0 = 30, DT = V0, V1 = DT, loop on the read
    let mut chip = get_chip(&[0x60, 0x1E, 0xF0, 0x15, 0xF1, 0x07, 0x12, 0x04]);
    let cycles = Config::default().cycles_per_frame();

    chip.frame(cycles);
    assert_eq!(chip.delay_timer(), 30);
    for _ in 0..30 {
        chip.tick_timers();
        chip.frame(cycles);
    }
    assert_eq!(chip.delay_timer(), 0);
    assert_eq!(chip.register(0x1), 0);
}

#[test]
fn test_subroutine_round_trip() {
    // call 0x206, V1 = 1 after the return, loop; 0x206: V0 = 0xAA, return
    let mut chip = get_chip(&[
        0x22, 0x06, 0x61, 0x01, 0x12, 0x04, 0x60, 0xAA, 0x00, 0xEE,
    ]);
    chip.frame(5);
    assert_eq!(chip.register(0x0), 0xAA);
    assert_eq!(chip.register(0x1), 0x01);
    assert_eq!(chip.stack_depth(), 0);
    assert_eq!(chip.program_counter(), 0x204);
}

#[test]
fn test_quirk_presets() {
    // I = 0x300, store V0..V2, loop
    let program = [0xA3, 0x00, 0xF2, 0x55, 0x12, 0x04];
    let tests = [
        (Quirks::modern(), 0x300),
        (Quirks::cosmac_vip(), 0x303),
        (Quirks::chip48(), 0x302),
    ];
    for (quirks, expected) in tests.iter() {
        let rom = Rom::new("quirks", program.to_vec().into_boxed_slice()).expect("rom fits");
        let config = Config {
            quirks: *quirks,
            ..Config::default()
        };
        let mut chip = ChipSet::new(rom, &config);
        chip.frame(3);
        assert_eq!(chip.index_register(), *expected);
    }
}
