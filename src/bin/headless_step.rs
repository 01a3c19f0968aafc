use snes_core::{Bus, CoreConfig, CoreError, Cpu};
use std::path::{Path, PathBuf};
use std::process;

// Headless runner: loads a ROM image, resets the CPU and executes a fixed
// number of steps, then prints the register file and an optional WRAM range.
//
//   cargo run --release --bin headless_step -- roms/test.sfc --steps 5000
//   cargo run --release --bin headless_step -- game --config core.json --dump 0x0000 0x100
//
// RUST_LOG=trace together with DEBUG_TRACE=1 logs every instruction.

struct Args {
    rom: String,
    config: Option<PathBuf>,
    steps: u64,
    dump: Option<(u32, u32)>,
}

fn parse_u32_hex_or_dec(s: &str) -> Option<u32> {
    let s = s.trim();
    if let Some(stripped) = s.strip_prefix("0x").or_else(|| s.strip_prefix('$')) {
        u32::from_str_radix(stripped, 16).ok()
    } else {
        s.parse().ok()
    }
}

fn usage(program: &str) -> ! {
    eprintln!(
        "Usage: {} <rom> [--config core.json] [--steps N] [--dump START LEN]",
        program
    );
    eprintln!("Supported formats: .sfc, .smc");
    process::exit(2);
}

fn parse_args() -> Args {
    let mut args = std::env::args();
    let program = args.next().unwrap_or_else(|| "headless_step".to_string());
    let mut rom = None;
    let mut config = None;
    let mut steps = 1000;
    let mut dump = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--help" | "-h" => usage(&program),
            "--config" => match args.next() {
                Some(path) => config = Some(PathBuf::from(path)),
                None => usage(&program),
            },
            "--steps" => match args.next().as_deref().and_then(parse_u32_hex_or_dec) {
                Some(n) => steps = n as u64,
                None => usage(&program),
            },
            "--dump" => {
                let start = args.next().as_deref().and_then(parse_u32_hex_or_dec);
                let len = args.next().as_deref().and_then(parse_u32_hex_or_dec);
                match (start, len) {
                    (Some(start), Some(len)) => dump = Some((start, len)),
                    _ => usage(&program),
                }
            }
            _ if rom.is_none() => rom = Some(arg.clone()),
            _ => usage(&program),
        }
    }

    match rom {
        Some(rom) => Args {
            rom,
            config,
            steps,
            dump,
        },
        None => usage(&program),
    }
}

/// Accepts a direct path, a name under ./roms, or either without extension.
fn resolve_rom_path(arg: &str) -> Option<PathBuf> {
    fn with_ext(base: &Path) -> Option<PathBuf> {
        if base.extension().is_some() {
            return None;
        }
        ["sfc", "smc"]
            .iter()
            .map(|ext| base.with_extension(ext))
            .find(|p| p.exists())
    }

    let direct = PathBuf::from(arg);
    if direct.exists() {
        return Some(direct);
    }
    let in_roms = Path::new("roms").join(arg);
    if in_roms.exists() {
        return Some(in_roms);
    }
    with_ext(&direct).or_else(|| with_ext(&in_roms))
}

fn dump_wram(bus: &Bus, start: u32, len: u32) {
    let wram = bus.wram().as_slice();
    let start = start as usize;
    if start >= wram.len() {
        eprintln!(
            "WRAM start 0x{:05X} is outside WRAM size (0x{:05X})",
            start,
            wram.len()
        );
        return;
    }
    let end = (start + len as usize).min(wram.len());
    for (row, chunk) in wram[start..end].chunks(16).enumerate() {
        print!("{:05X}:", start + row * 16);
        for byte in chunk {
            print!(" {:02X}", byte);
        }
        println!();
    }
}

fn run(args: Args) -> snes_core::Result<()> {
    let config = match &args.config {
        Some(path) => CoreConfig::from_file(path)?,
        None => CoreConfig::default(),
    };
    let rom_path = resolve_rom_path(&args.rom)
        .ok_or_else(|| CoreError::InvalidRom(format!("ROM '{}' not found", args.rom)))?;
    let image = std::fs::read(&rom_path)?;

    let mut bus = Bus::from_config(image, &config)?;
    let mut cpu = Cpu::with_config(&config);
    cpu.initialise(&mut bus);
    log::info!(
        "{}: {:?}, reset PC {}",
        rom_path.display(),
        bus.rom_type(),
        cpu.state().program_address()
    );

    let mut executed = 0u64;
    while executed < args.steps {
        match cpu.step(&mut bus) {
            Ok(_) => executed += 1,
            Err(CoreError::Stopped { address }) => {
                log::info!("CPU stopped at {} after {} steps", address, executed);
                break;
            }
            Err(e) => {
                log::error!("{} (after {} steps)", e, executed);
                break;
            }
        }
    }

    let s = cpu.snapshot();
    println!(
        "steps={} cycles={} PC={:02X}:{:04X} A={:04X} X={:04X} Y={:04X} S={:04X} D={:04X} DB={:02X} P={:02X} E={} open_bus_reads={}",
        executed,
        s.cycles,
        s.pb,
        s.pc,
        s.a,
        s.x,
        s.y,
        s.sp,
        s.dp,
        s.db,
        s.p.bits(),
        s.emulation_mode as u8,
        bus.open_bus_reads()
    );

    if let Some((start, len)) = args.dump {
        dump_wram(&bus, start, len);
    }
    Ok(())
}

fn main() {
    env_logger::init();
    let args = parse_args();
    if let Err(e) = run(args) {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}
