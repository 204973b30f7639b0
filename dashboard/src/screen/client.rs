//! Client screen.

use common::operations::By;
use service::{
    command::{
        self, add_to_cart, checkout, clear_cart, remove_from_cart,
        update_cart_item,
    },
    domain::{
        order::{Action, Address},
        product,
        user::Role,
        Cart, Product,
    },
    query::{ApiQuery, StorageQuery},
    read::order::Scope,
    Command as _,
};

use crate::{args, define_error, render, AsError, Context, Error};

/// Runs the provided [`args::Client`] command.
///
/// # Errors
///
/// If the signed-in user is not a client, or the command fails.
pub async fn run(ctx: &Context, cmd: args::Client) -> Result<String, Error> {
    use args::Client as C;

    let me = ctx.require(&[Role::Client]).await?.user.id;
    match cmd {
        C::Products => products(ctx).await,
        C::Cart => {
            let cart = ctx
                .service()
                .execute(StorageQuery::<By<Option<Cart>, ()>>::stored())
                .await
                .map_err(AsError::into_error)?
                .unwrap_or_default();
            Ok(render_cart(&cart))
        }
        C::CartAdd { id, quantity } => {
            let cart = ctx
                .service()
                .execute(command::AddToCart {
                    product_id: product::Id::from(id),
                    quantity,
                })
                .await
                .map_err(AsError::into_error)?;
            Ok(render_cart(&cart))
        }
        C::CartSet { id, quantity } => {
            let cart = ctx
                .service()
                .execute(command::UpdateCartItem {
                    product_id: product::Id::from(id),
                    quantity,
                })
                .await
                .map_err(AsError::into_error)?;
            Ok(render_cart(&cart))
        }
        C::CartRemove { id } => {
            let cart = ctx
                .service()
                .execute(command::RemoveFromCart {
                    product_id: product::Id::from(id),
                })
                .await
                .map_err(AsError::into_error)?;
            Ok(render_cart(&cart))
        }
        C::CartClear => {
            ctx.service()
                .execute(command::ClearCart)
                .await
                .map_err(AsError::into_error)?;
            Ok(render_cart(&Cart::default()))
        }
        C::Checkout(fields) => checkout(ctx, fields).await,
        C::Orders(opts) => {
            super::list_orders(ctx, Scope::Client(me), opts, false).await
        }
        C::Cancel(opts) => super::transit(ctx, Action::Cancel, opts).await,
        C::Receive(opts) => {
            super::transit(ctx, Action::ConfirmReceipt, opts).await
        }
    }
}

/// Renders products available to order.
async fn products(ctx: &Context) -> Result<String, Error> {
    let mut products = ctx
        .service()
        .execute(ApiQuery::<By<Vec<Product>, ()>>::all())
        .await
        .map_err(AsError::into_error)?;
    products.retain(Product::is_in_stock);

    Ok(products_table(&products).to_string())
}

/// Places an order out of the cart.
async fn checkout(ctx: &Context, fields: args::Checkout) -> Result<String, Error> {
    let args::Checkout {
        street,
        city,
        state,
        postal_code,
        country,
        payment,
        shipping,
    } = fields;

    let order = ctx
        .service()
        .execute(command::Checkout {
            shipping_address: Address {
                street,
                city,
                state,
                postal_code,
                country,
            },
            payment_method: payment,
            shipping_method: shipping,
        })
        .await
        .map_err(AsError::into_error)?;

    Ok(format!("Order placed\n{}", render::order(&order)))
}

/// Builds a [`render::Table`] of the provided [`Product`]s.
pub(super) fn products_table(products: &[Product]) -> render::Table {
    let mut table = render::Table::new([
        "ID", "Name", "Category", "Price", "Stock", "Supplier",
    ]);
    for p in products {
        _ = table.row([
            p.id.to_string(),
            p.name.to_string(),
            p.category.clone().unwrap_or_else(|| "-".to_owned()),
            format!("{:.2}", p.price.round_dp(2)),
            p.stock.to_string(),
            p.supplier_id
                .as_ref()
                .map_or_else(|| "-".to_owned(), ToString::to_string),
        ]);
    }
    table
}

/// Renders the provided [`Cart`] with its subtotal.
fn render_cart(cart: &Cart) -> String {
    let mut table =
        render::Table::new(["Product", "Name", "Price", "Qty", "Subtotal"]);
    for i in cart.items() {
        _ = table.row([
            i.product_id.to_string(),
            i.name.clone(),
            format!("{:.2}", i.unit_price.round_dp(2)),
            i.quantity.to_string(),
            format!("{:.2}", i.subtotal().round_dp(2)),
        ]);
    }
    format!(
        "{table}{}",
        render::cards(&[
            ("Items", cart.units().to_string()),
            ("Subtotal", format!("{:.2}", cart.subtotal().round_dp(2))),
        ]),
    )
}

impl AsError for add_to_cart::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "PRODUCT_NOT_FOUND"]
                #[status = NOT_FOUND]
                #[message = "Product does not exist"]
                ProductNotExists,

                #[code = "OUT_OF_STOCK"]
                #[status = CONFLICT]
                #[message = "Product is out of stock"]
                OutOfStock,

                #[code = "ZERO_QUANTITY"]
                #[status = BAD_REQUEST]
                #[message = "Quantity must be positive"]
                ZeroQuantity,
            }
        }

        match self {
            Self::Api(e) => e.try_as_error(),
            Self::Storage(e) => e.try_as_error(),
            Self::ProductNotExists(_) => Some(Error::ProductNotExists.into()),
            Self::OutOfStock(_) => Some(Error::OutOfStock.into()),
            Self::ZeroQuantity => Some(Error::ZeroQuantity.into()),
        }
    }
}

define_error! {
    enum CartError {
        #[code = "NOT_IN_CART"]
        #[status = NOT_FOUND]
        #[message = "Product is not in the cart"]
        NotInCart,
    }
}

impl AsError for update_cart_item::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Storage(e) => e.try_as_error(),
            Self::NotInCart(_) => Some(CartError::NotInCart.into()),
        }
    }
}

impl AsError for remove_from_cart::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Storage(e) => e.try_as_error(),
            Self::NotInCart(_) => Some(CartError::NotInCart.into()),
        }
    }
}

impl AsError for clear_cart::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Storage(e) => e.try_as_error(),
        }
    }
}

impl AsError for checkout::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "NOT_SIGNED_IN"]
                #[status = UNAUTHORIZED]
                #[message = "Sign in first"]
                NotSignedIn,

                #[code = "NOT_CLIENT"]
                #[status = FORBIDDEN]
                #[message = "Only clients can place orders"]
                NotClient,

                #[code = "EMPTY_CART"]
                #[status = BAD_REQUEST]
                #[message = "Cart is empty"]
                EmptyCart,

                #[code = "INCOMPLETE_ADDRESS"]
                #[status = BAD_REQUEST]
                #[message = "Shipping address is incomplete"]
                Address,
            }
        }

        match self {
            Self::Api(e) => e.try_as_error(),
            Self::Storage(e) => e.try_as_error(),
            Self::NotSignedIn => Some(Error::NotSignedIn.into()),
            Self::NotClient => Some(Error::NotClient.into()),
            Self::EmptyCart => Some(Error::EmptyCart.into()),
            Self::Address(e) => {
                let mut err: crate::Error = Error::Address.into();
                err.message = format!("{}: {e}", err.message);
                Some(err)
            }
        }
    }
}
