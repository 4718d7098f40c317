use std::error::Error;

use chrono::Local;
use tracing_subscriber::EnvFilter;

use rejseplan::domain::{CommonData, SectionKind, ServiceTime, Trip, TripSection};
use rejseplan::hafas::{
    HafasClient, HafasConfig, HttpTransport, LocationQuery, TripSearchRequest,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let [origin, destination] = args.as_slice() else {
        eprintln!("usage: rejseplan <origin> <destination>");
        std::process::exit(2);
    };

    let mut config = HafasConfig::default();
    if let Ok(url) = std::env::var("REJSEPLAN_BASE_URL") {
        config = config.with_base_url(url);
    }
    if let Ok(aid) = std::env::var("REJSEPLAN_AID") {
        config = config.with_aid(aid);
    }
    if let Ok(lang) = std::env::var("REJSEPLAN_LANG") {
        config = config.with_language(lang);
    }

    let transport = HttpTransport::new(&config)?;
    let client = HafasClient::new(transport, config);

    let Some(from) = client
        .search_location(&LocationQuery::new(origin))
        .await?
        .into_iter()
        .next()
    else {
        eprintln!("no location matches {origin:?}");
        std::process::exit(1);
    };
    let Some(to) = client
        .search_location(&LocationQuery::new(destination))
        .await?
        .into_iter()
        .next()
    else {
        eprintln!("no location matches {destination:?}");
        std::process::exit(1);
    };

    println!("{} -> {}", from.name, to.name);

    let request = TripSearchRequest::new(from, to, Local::now().naive_local());
    let result = client.plan_trip(&request).await?;

    if result.trips.is_empty() {
        println!("No trips found.");
    }

    for trip in &result.trips {
        print_trip(trip, &result.common);
    }

    Ok(())
}

fn clock(time: Option<&str>) -> String {
    time.and_then(|t| ServiceTime::parse(t).ok())
        .map_or_else(|| "--:--".to_string(), |t| t.to_string())
}

fn place(common: &CommonData, section: &TripSection, departure: bool) -> String {
    let endpoint = if departure {
        &section.departure
    } else {
        &section.arrival
    };
    common
        .location(endpoint.location)
        .map_or_else(|_| "?".to_string(), |l| l.name.clone())
}

fn print_trip(trip: &Trip, common: &CommonData) {
    let duration = trip
        .total_duration()
        .map(|d| format!("{} min", d.num_minutes()))
        .unwrap_or_else(|_| trip.duration.clone());

    println!();
    println!(
        "{} - {}  {}  {} change(s){}",
        clock(trip.departure_time.as_deref()),
        clock(trip.arrival_time.as_deref()),
        duration,
        trip.changes,
        if trip.requires_booking() {
            "  [booking required]"
        } else {
            ""
        }
    );

    for notice in trip.booking_notices() {
        if let Some(text) = &notice.text {
            println!("  booking: {text}");
        }
    }

    for section in &trip.sections {
        let what = match &section.kind {
            SectionKind::Walk(gis) => {
                let points = gis.polyline().map_or(0, |p| p.len());
                format!("walk {} m ({} points)", gis.distance, points)
            }
            SectionKind::Journey(journey) => journey
                .product
                .and_then(|p| common.product(p).ok())
                .map_or_else(|| "journey".to_string(), |p| p.name.clone()),
            SectionKind::DialARide(ride) => {
                let name = ride
                    .journey
                    .product
                    .and_then(|p| common.product(p).ok())
                    .map_or("dial-a-ride", |p| p.name.as_str());
                match ride.booking_deadline_minutes {
                    Some(minutes) => format!("{name}, book {minutes} min ahead"),
                    None => name.to_string(),
                }
            }
            _ => section.mode().to_string(),
        };

        println!(
            "  {} {} -> {} {}  {}",
            clock(section.departure.departure_time.as_deref()),
            place(common, section, true),
            clock(section.arrival.arrival_time.as_deref()),
            place(common, section, false),
            what
        );
    }
}
