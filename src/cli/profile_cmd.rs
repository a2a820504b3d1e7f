use anyhow::Result;

use crate::cli::output::OutputOptions;
use crate::core::ip::{format_range, parse_range};
use crate::core::models::profile::Profile;
use crate::core::store;

pub fn list(_opts: &OutputOptions) -> Result<()> {
    let profiles = store::load()?;
    if profiles.is_empty() {
        println!("No profiles stored. Add one with `qm profile add <RANGE> <NAME>`,");
        println!("or run `qm` to discover ranges from the router report.");
        return Ok(());
    }

    for profile in &profiles {
        let marker = if profile.visible { " " } else { "(hidden) " };
        println!(
            "  {}{}  {}",
            marker,
            format_range(profile.min_ip, profile.max_ip),
            profile.name
        );
    }
    Ok(())
}

pub fn add(range: &str, name: &str, _opts: &OutputOptions) -> Result<()> {
    let Some((min_ip, max_ip)) = parse_range(range) else {
        eprintln!("Invalid range: '{}' (expected A.B.C.D or A.B.C.D-A.B.C.D)", range);
        std::process::exit(1);
    };
    if min_ip > max_ip {
        eprintln!("Invalid range: minimum address is above the maximum");
        std::process::exit(1);
    }

    let mut profiles = store::load()?;
    if profiles.iter().any(|p| p.same_range(min_ip, max_ip)) {
        eprintln!("A profile for {} already exists", format_range(min_ip, max_ip));
        std::process::exit(1);
    }

    profiles.push(Profile::from_range(min_ip, max_ip, name.to_string(), true));
    store::save(&profiles)?;
    println!("Added profile '{}' for {}", name, format_range(min_ip, max_ip));
    Ok(())
}

pub fn remove(name: &str, _opts: &OutputOptions) -> Result<()> {
    let mut profiles = store::load()?;
    let before = profiles.len();
    profiles.retain(|p| p.name != name);

    if profiles.len() == before {
        eprintln!("No profile named '{}'", name);
        std::process::exit(1);
    }

    store::save(&profiles)?;
    println!("Removed profile '{}'", name);
    Ok(())
}

pub fn set_visible(name: &str, visible: bool, _opts: &OutputOptions) -> Result<()> {
    let mut profiles = store::load()?;
    let Some(profile) = profiles.iter_mut().find(|p| p.name == name) else {
        eprintln!("No profile named '{}'", name);
        std::process::exit(1);
    };

    profile.visible = visible;
    store::save(&profiles)?;
    println!(
        "Profile '{}' is now {}",
        name,
        if visible { "shown" } else { "hidden" }
    );
    Ok(())
}
