//! [`Args`] definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use service::domain::order::{PaymentMethod, ShippingMethod, Status};

/// Terminal dashboard of the supply chain management system.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to the configuration file.
    #[arg(short, long, default_value = "dashboard.toml")]
    pub config: String,

    /// Command to run.
    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    /// Parses command line arguments.
    ///
    /// # Errors
    ///
    /// Errors if failed to parse command line arguments.
    pub fn parse() -> Result<Self, clap::Error> {
        <Self as Parser>::try_parse()
    }
}

/// Top-level command.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Signs in with the provided credentials.
    Login {
        /// Email of the user.
        #[arg(long)]
        email: String,

        /// Password of the user.
        #[arg(long)]
        password: String,
    },

    /// Signs out, keeping the cart.
    Logout,

    /// Shows the signed-in user.
    Whoami,

    /// Lists notifications of the signed-in user.
    Notifications {
        /// ID of the notification to mark as read.
        #[arg(long)]
        read: Option<String>,
    },

    /// Admin screen.
    #[command(subcommand)]
    Admin(Admin),

    /// Employee screen.
    #[command(subcommand)]
    Employee(Employee),

    /// Supplier screen.
    #[command(subcommand)]
    Supplier(Supplier),

    /// Client screen.
    #[command(subcommand)]
    Client(Client),
}

/// Admin screen commands.
#[derive(Debug, Subcommand)]
pub enum Admin {
    /// KPI cards, status breakdown and monthly volume of all orders.
    Overview,

    /// Lists all orders.
    Orders(Orders),

    /// Lists supplier performance, the best first.
    Suppliers {
        /// Path to export the rows to as CSV.
        #[arg(long)]
        export: Option<PathBuf>,
    },

    /// Lists products.
    Products,

    /// Creates a product, or updates the one with the provided ID.
    ProductSave(Product),

    /// Deletes the product.
    ProductDelete {
        /// ID of the product.
        id: String,
    },

    /// Lists contracts.
    Contracts,

    /// Lists clients.
    Clients,
}

/// Employee screen commands.
#[derive(Debug, Subcommand)]
pub enum Employee {
    /// Lists all orders.
    Orders(Orders),

    /// Confirms a created order.
    Confirm(Transition),

    /// Advances an order to its next status.
    Advance(Transition),

    /// Cancels a created order.
    Cancel(Transition),
}

/// Supplier screen commands.
#[derive(Debug, Subcommand)]
pub enum Supplier {
    /// Lists orders no supplier has claimed yet.
    Available(Orders),

    /// Claims an order.
    Claim(Transition),

    /// Lists orders claimed by the signed-in supplier.
    Orders(Orders),

    /// Shows delivery performance of the signed-in supplier.
    Performance,
}

/// Client screen commands.
#[derive(Debug, Subcommand)]
pub enum Client {
    /// Lists products available to order.
    Products,

    /// Shows the cart.
    Cart,

    /// Adds a product to the cart.
    CartAdd {
        /// ID of the product.
        id: String,

        /// Quantity to add.
        quantity: u32,
    },

    /// Sets the quantity of a product in the cart, `0` removes it.
    CartSet {
        /// ID of the product.
        id: String,

        /// New quantity.
        quantity: u32,
    },

    /// Removes a product from the cart.
    CartRemove {
        /// ID of the product.
        id: String,
    },

    /// Empties the cart.
    CartClear,

    /// Places an order out of the cart.
    Checkout(Checkout),

    /// Lists orders of the signed-in client.
    Orders(Orders),

    /// Cancels a created order.
    Cancel(Transition),

    /// Confirms receipt of a delivered order.
    Receive(Transition),
}

/// Order listing options.
#[derive(Clone, Debug, Default, clap::Args)]
pub struct Orders {
    /// Status the orders must have.
    #[arg(long)]
    pub status: Option<Status>,

    /// Substring to search for in order IDs, clients, items and addresses.
    #[arg(long)]
    pub search: Option<String>,

    /// 1-based page number.
    #[arg(long)]
    pub page: Option<usize>,

    /// Number of orders per page.
    #[arg(long)]
    pub per_page: Option<usize>,

    /// Path to export the listed orders to as CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,
}

/// Order transition options.
#[derive(Clone, Debug, clap::Args)]
pub struct Transition {
    /// ID of the order.
    pub id: String,

    /// Comment to leave in the order history.
    #[arg(long)]
    pub comment: Option<String>,
}

/// Product fields.
#[derive(Clone, Debug, clap::Args)]
pub struct Product {
    /// ID of the product to update, a new one is created when omitted.
    #[arg(long)]
    pub id: Option<String>,

    /// Name of the product.
    #[arg(long)]
    pub name: String,

    /// Description of the product.
    #[arg(long)]
    pub description: Option<String>,

    /// Category of the product.
    #[arg(long)]
    pub category: Option<String>,

    /// Unit price of the product.
    #[arg(long)]
    pub price: Decimal,

    /// Units in stock.
    #[arg(long, default_value_t = 0)]
    pub stock: u32,

    /// ID of the supplier of the product.
    #[arg(long)]
    pub supplier: Option<String>,
}

/// Checkout fields.
#[derive(Clone, Debug, clap::Args)]
pub struct Checkout {
    /// Street of the shipping address.
    #[arg(long)]
    pub street: String,

    /// City of the shipping address.
    #[arg(long)]
    pub city: String,

    /// State of the shipping address.
    #[arg(long, default_value = "")]
    pub state: String,

    /// Postal code of the shipping address.
    #[arg(long)]
    pub postal_code: String,

    /// Country of the shipping address.
    #[arg(long)]
    pub country: String,

    /// Payment method.
    #[arg(long, default_value = "Credit Card")]
    pub payment: PaymentMethod,

    /// Shipping method.
    #[arg(long, default_value = "Standard")]
    pub shipping: ShippingMethod,
}
