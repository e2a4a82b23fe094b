//! CLI module - Command-line interface for pantry
//!
//! Every command prints its result as pretty JSON on stdout.

mod commands;

use crate::constants::DEFAULT_LANGUAGE;
use clap::{Args, Parser, Subcommand};

/// pantry - find recipes you can cook with what you have
#[derive(Parser)]
#[command(name = "pantry")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List recipes, ranked by ingredient coverage when ingredients are given
    #[command(alias = "ls")]
    Recipes(ListArgs),

    /// Show one recipe scored against an ingredient set
    Recipe {
        /// Recipe ID
        id: i32,
        /// Comma separated ingredient IDs
        #[arg(long, short, default_value = "")]
        ingredients: String,
    },

    /// List diet, meal-type and kitchen tags
    Tags,

    /// List ingredient categories
    Categories {
        #[arg(long, default_value = DEFAULT_LANGUAGE)]
        lang: String,
    },

    /// Browse or search the ingredient catalogue
    Ingredients {
        /// Substring to search for; without it the grouped tree is printed
        #[arg(long, short)]
        search: Option<String>,
        #[arg(long, default_value = DEFAULT_LANGUAGE)]
        lang: String,
    },

    /// Most viewed recipes or most used ingredients
    Popular {
        #[command(subcommand)]
        kind: PopularCommands,
    },

    /// Manage a user's saved recipes
    Saved {
        #[command(subcommand)]
        command: SavedCommands,
    },

    /// Run a cache action (stats, clear-recipes, ..., flush-all)
    Cache {
        action: String,
    },

    /// Create default config file
    #[command(alias = "--init")]
    Init,
}

#[derive(Args)]
pub struct ListArgs {
    /// Comma separated ingredient IDs
    #[arg(long, short, default_value = "")]
    pub ingredients: String,
    /// Comma separated diet tag IDs
    #[arg(long, default_value = "")]
    pub diets: String,
    /// Comma separated meal-type IDs
    #[arg(long, default_value = "")]
    pub meal_types: String,
    /// Comma separated kitchen IDs
    #[arg(long, default_value = "")]
    pub kitchens: String,
    #[arg(long, default_value = DEFAULT_LANGUAGE)]
    pub lang: String,
    /// Title search
    #[arg(long, short)]
    pub search: Option<String>,
    #[arg(long)]
    pub limit: Option<i64>,
    #[arg(long)]
    pub offset: Option<i64>,
}

#[derive(Subcommand)]
pub enum PopularCommands {
    Recipes {
        #[arg(long, default_value = DEFAULT_LANGUAGE)]
        lang: String,
        #[arg(long)]
        limit: Option<u64>,
    },
    Ingredients {
        #[arg(long, default_value = DEFAULT_LANGUAGE)]
        lang: String,
        #[arg(long)]
        limit: Option<u64>,
    },
}

#[derive(Subcommand)]
pub enum SavedCommands {
    /// List saved recipes
    #[command(alias = "ls")]
    List {
        user: i32,
        /// Include ingredient lines and tags
        #[arg(long)]
        full: bool,
    },
    /// Save a recipe
    Add { user: i32, recipe: i32 },
    /// Remove a saved recipe
    #[command(alias = "rm")]
    Remove { user: i32, recipe: i32 },
}

pub use commands::*;
