use clap::Subcommand;
use focusfalcon_core::{Avatar, StateStore};

use crate::runtime::Runtime;

#[derive(Subcommand)]
pub enum AvatarAction {
    /// Show the selected avatar
    Show,
    /// List available avatars
    List,
    /// Select an avatar by id
    Set { id: String },
}

pub fn run(action: AvatarAction) -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::open()?;
    let state = StateStore::new(&rt.db);

    match action {
        AvatarAction::Show => {
            let avatar = state.avatar();
            println!("{} ({}): {}", avatar.label(), avatar.id(), avatar.personality());
            println!("{}", avatar.image());
        }
        AvatarAction::List => {
            for avatar in Avatar::ALL {
                println!("{:<10} {}", avatar.id(), avatar.label());
            }
        }
        AvatarAction::Set { id } => {
            let avatar = Avatar::from_id(&id).ok_or_else(|| format!("unknown avatar: {id}"))?;
            state.save_avatar(avatar)?;
            println!("avatar set to {}", avatar.label());
        }
    }
    Ok(())
}
