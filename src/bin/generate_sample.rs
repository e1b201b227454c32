use anyhow::{Context, Result};
use serde::Serialize;

/// One class in the generated timetable.
#[derive(Serialize)]
struct ClassRow {
    semester: u8,
    section: String,
    school: &'static str,
    course: String,
    day: &'static str,
    time: &'static str,
    venue: String,
    faculty_school: &'static str,
}

const HEADER: [&str; 8] = [
    "Semester",
    "Section",
    "School",
    "Course Code",
    "Day",
    "Time",
    "Venue",
    "Faculty School",
];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }
}

fn main() -> Result<()> {
    let output_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "sample_timetable.csv".to_string());

    let mut rng = SimpleRng::new(42);

    let schools = ["SCSE", "SBAS", "SMEC", "SOL"];
    let days = ["Mon", "Tue", "Wed", "Thu", "Fri"];
    let times = ["09:00-10:00", "10:00-11:00", "11:30-12:30", "14:00-15:00"];
    let blocks = ["A", "B", "C"];

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(&output_path)
        .with_context(|| format!("creating {output_path}"))?;

    // Title rows above the real header, as in exported university timetables.
    writer.write_record(["Class Timetable - Odd Semester"])?;
    writer.write_record(["Generated sample", "", ""])?;
    writer.write_record(HEADER)?;

    let mut rows = 0;
    for semester in 1..=8u8 {
        for section in 1..=4 {
            for course in 1..=5 {
                let school = *rng.pick(&schools);
                let row = ClassRow {
                    semester,
                    section: format!("{}{section}", if section % 2 == 0 { "E" } else { "C" }),
                    school,
                    course: format!("{school}{semester}{course:02}"),
                    day: *rng.pick(&days),
                    time: *rng.pick(&times),
                    venue: format!("LT-{}{}", rng.pick(&blocks), 100 + rng.next_u64() % 20),
                    faculty_school: *rng.pick(&schools),
                };
                writer.serialize(&row)?;
                rows += 1;
            }
        }
    }
    writer.flush().context("flushing output")?;

    println!("Wrote {rows} classes to {output_path} (header on row 2)");
    Ok(())
}
