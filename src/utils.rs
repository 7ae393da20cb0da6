//! Formatting, export and terminal visualisation of route plans.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::Result;
use crate::problem::{Coordinate, Problem};
use crate::solution::RouteOption;

/// Format a duration as hours, minutes, and seconds.
pub fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.as_secs();
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}h {:02}m {:02}s", hours, minutes, seconds)
}

/// Metres as kilometres with two decimals.
pub fn format_km(metres: f64) -> String {
    format!("{:.2} km", metres / 1000.0)
}

/// Seconds as whole minutes plus hours with one decimal.
pub fn format_travel_time(seconds: f64) -> String {
    let minutes = (seconds / 60.0).round();
    format!("{} min ({:.1} h)", minutes, minutes / 60.0)
}

/// Write the visiting order of `option` as CSV, one row per stop, start first.
pub fn write_route_csv<W: Write>(
    writer: W,
    option: &RouteOption,
    problem: &Problem,
) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record([
        "Sequence",
        "Outlet ID",
        "Outlet Name",
        "Beat Name",
        "Latitude",
        "Longitude",
        "Visit Order",
        "Notes",
    ])?;

    for (sequence, &stop) in option.route.stops().iter().enumerate() {
        let coordinate = problem.coordinate(stop);
        let (id, name, visit, notes) = match problem.destination(stop) {
            Some(point) => (
                point.id.clone(),
                point.display_name().to_string(),
                format!("Stop {sequence}"),
                option.name.clone(),
            ),
            None => (
                "START".to_string(),
                "Start Location".to_string(),
                "Starting Point".to_string(),
                "Begin route from this location".to_string(),
            ),
        };
        csv.write_record([
            sequence.to_string(),
            id,
            name,
            problem.name.clone(),
            format!("{:.6}", coordinate.lat),
            format!("{:.6}", coordinate.lng),
            visit,
            notes,
        ])?;
    }

    csv.flush()?;
    Ok(())
}

/// Path of the plan summary written next to a route file: `<path>.summary.txt`.
pub fn summary_path<P: AsRef<Path>>(path: P) -> PathBuf {
    let mut name = path.as_ref().as_os_str().to_os_string();
    name.push(".summary.txt");
    PathBuf::from(name)
}

/// Save the visiting order of `option` to a CSV file, with the plan summary
/// beside it at [`summary_path`]. Returns the summary's path.
pub fn save_route_plan<P: AsRef<Path>>(
    option: &RouteOption,
    problem: &Problem,
    path: P,
) -> Result<PathBuf> {
    let path = path.as_ref();
    write_route_csv(File::create(path)?, option, problem)?;

    let summary = summary_path(path);
    let mut file = File::create(&summary)?;
    writeln!(file, "{}", format_plan_summary(option, problem))?;
    Ok(summary)
}

/// Human-readable summary of a selected option.
pub fn format_plan_summary(option: &RouteOption, problem: &Problem) -> String {
    let stops = option.route.destination_count();
    let average = if stops > 0 {
        option.total_distance / stops as f64
    } else {
        0.0
    };
    format!(
        "Route plan for {}
- Option: {}
- Stops: {}
- Distance: {}
- Duration: {}
- Avg per Stop: {}
- Start: {}",
        problem.name,
        option.name,
        stops,
        format_km(option.total_distance),
        format_travel_time(option.total_duration),
        format_km(average),
        problem.start
    )
}

/// Statistics about one planning run.
pub struct PlanStatistics {
    pub runtime: Duration,
    pub destinations: usize,
    pub options: usize,
    pub best_option: String,
    pub best_distance: f64,
    pub worst_distance: f64,
}

impl PlanStatistics {
    /// Format the statistics as a string.
    pub fn format(&self) -> String {
        format!(
            "Planning Statistics:
- Runtime: {}
- Destinations: {}
- Options: {}
- Best Option: {}
- Best Distance: {}
- Spread to Worst: {}",
            format_duration(self.runtime),
            self.destinations,
            self.options,
            self.best_option,
            format_km(self.best_distance),
            format_km(self.worst_distance - self.best_distance)
        )
    }
}

/// Print the stops of an option and its route geometry on a character grid.
///
/// `S` marks the start; the first nine stops show their sequence number and
/// later ones `*`. The geometry polyline is traced with `.` underneath.
pub fn print_route_visualization(option: &RouteOption, problem: &Problem, geometry: &[Coordinate]) {
    println!("Route Visualization for {}", problem.name);
    println!("Option: {}", option.name);
    println!("Total Distance: {}", format_km(option.total_distance));
    println!();

    for row in render_route_grid(option, problem, geometry, 80, 25) {
        println!("{}", row);
    }
    println!();

    println!("Legend:");
    println!("S - Start");
    println!("1-9 - First stops in visiting order");
    println!("* - Later stops");
    println!(". - Route geometry");
    println!();
}

/// Render the stops of an option onto a `width`×`height` grid, north up.
///
/// Consecutive `geometry` points are joined with `.` cells; stops are drawn
/// over the trace. The bounds cover both stops and geometry.
pub fn render_route_grid(
    option: &RouteOption,
    problem: &Problem,
    geometry: &[Coordinate],
    width: usize,
    height: usize,
) -> Vec<String> {
    let stops = option.route.stops();
    if width == 0 || height == 0 {
        return vec![String::new(); height];
    }

    // Find coordinate bounds for scaling
    let mut min_lat = f64::MAX;
    let mut min_lng = f64::MAX;
    let mut max_lat = f64::MIN;
    let mut max_lng = f64::MIN;

    let points = stops
        .iter()
        .map(|&stop| problem.coordinate(stop))
        .chain(geometry.iter().copied());
    for c in points {
        min_lat = min_lat.min(c.lat);
        min_lng = min_lng.min(c.lng);
        max_lat = max_lat.max(c.lat);
        max_lng = max_lng.max(c.lng);
    }

    let scale = |value: f64, min: f64, max: f64, cells: usize| -> f64 {
        if max - min <= f64::EPSILON {
            return (cells / 2) as f64;
        }
        ((value - min) / (max - min)) * (cells as f64 - 1.0)
    };
    let cell = |c: Coordinate| -> (f64, f64) {
        let x = scale(c.lng, min_lng, max_lng, width);
        let y = (height - 1) as f64 - scale(c.lat, min_lat, max_lat, height);
        (x, y)
    };

    let mut grid = vec![vec![' '; width]; height];

    for segment in geometry.windows(2) {
        let (x0, y0) = cell(segment[0]);
        let (x1, y1) = cell(segment[1]);
        let steps = (x1 - x0).abs().max((y1 - y0).abs()).round().max(1.0) as usize;
        for k in 0..=steps {
            let t = k as f64 / steps as f64;
            let x = (x0 + (x1 - x0) * t).round() as usize;
            let y = (y0 + (y1 - y0) * t).round() as usize;
            grid[y.min(height - 1)][x.min(width - 1)] = '.';
        }
    }

    // Draw later stops first so the start and early stops stay visible
    for (sequence, &stop) in stops.iter().enumerate().rev() {
        let (x, y) = cell(problem.coordinate(stop));
        let (x, y) = (x.round() as usize, y.round() as usize);

        grid[y][x] = match sequence {
            0 => 'S',
            1..=9 => char::from_digit(sequence as u32, 10).unwrap_or('*'),
            _ => '*',
        };
    }

    grid.into_iter().map(|row| row.into_iter().collect()).collect()
}
