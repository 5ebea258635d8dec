//! The add-product-to-cart use case.

use async_trait::async_trait;
use common::{CustomerId, ProductId};
use domain::Cart;

use crate::error::CheckoutError;
use crate::ports::{CartRepository, CustomerGateway, ProductGateway};

/// Request to add a product to a customer's cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddProductToCartInput {
    pub customer_id: CustomerId,
    pub product_id: ProductId,
    pub quantity: i32,
}

impl AddProductToCartInput {
    pub fn new(customer_id: CustomerId, product_id: ProductId, quantity: i32) -> Self {
        Self {
            customer_id,
            product_id,
            quantity,
        }
    }
}

/// Object-safe entry point, so request handlers can hold any wiring of the
/// use case behind a `dyn`.
#[async_trait]
pub trait AddProductToCartUseCase: Send + Sync {
    async fn execute(&self, input: AddProductToCartInput) -> Result<(), CheckoutError>;
}

/// Adds a product to the customer's cart, creating the cart on first use.
///
/// Runs strictly in sequence: customer check, price lookup, cart load,
/// mutation, then exactly one persistence call. Every failure happens before
/// that last call, so a stored cart is always fully validated. Port errors
/// are forwarded unchanged and never retried.
///
/// Two concurrent calls for the same customer are not coordinated here; the
/// cart repository's uniqueness constraint is what stops a second cart.
pub struct AddProductToCart<C, P, R>
where
    C: CustomerGateway,
    P: ProductGateway,
    R: CartRepository,
{
    customers: C,
    products: P,
    carts: R,
}

impl<C, P, R> AddProductToCart<C, P, R>
where
    C: CustomerGateway,
    P: ProductGateway,
    R: CartRepository,
{
    /// Creates the use case from its three ports.
    pub fn new(customers: C, products: P, carts: R) -> Self {
        Self {
            customers,
            products,
            carts,
        }
    }

    pub fn customers(&self) -> &C {
        &self.customers
    }

    pub fn products(&self) -> &P {
        &self.products
    }

    pub fn carts(&self) -> &R {
        &self.carts
    }

    /// Runs the use case.
    #[tracing::instrument(
        skip(self, input),
        fields(
            customer_id = %input.customer_id,
            product_id = %input.product_id,
            quantity = input.quantity,
        )
    )]
    pub async fn execute(&self, input: AddProductToCartInput) -> Result<(), CheckoutError> {
        let result = self.add_product(input).await;

        match &result {
            Ok(()) => metrics::counter!("cart_items_added_total").increment(1),
            Err(err) => {
                metrics::counter!("add_product_to_cart_failed_total", "reason" => err.kind().as_str())
                    .increment(1);
            }
        }

        result
    }

    async fn add_product(&self, input: AddProductToCartInput) -> Result<(), CheckoutError> {
        let AddProductToCartInput {
            customer_id,
            product_id,
            quantity,
        } = input;

        if !self.customers.exists(customer_id).await? {
            tracing::warn!("customer not found");
            return Err(CheckoutError::CustomerNotFound(customer_id));
        }

        let product = self
            .products
            .find_by_id(product_id)
            .await?
            .ok_or_else(|| {
                tracing::warn!("product not found");
                CheckoutError::ProductNotFound(product_id)
            })?;

        match self.carts.find_by_customer_id(customer_id).await? {
            Some(mut cart) => {
                cart.add_item(product.id, quantity, product.unit_price.cents())?;
                self.carts.update(&cart).await?;

                metrics::counter!("carts_updated_total").increment(1);
                tracing::info!(cart_id = %cart.id(), items = cart.item_count(), "cart updated");
            }
            None => {
                let mut cart = Cart::new(customer_id);
                cart.add_item(product.id, quantity, product.unit_price.cents())?;
                self.carts.create(&cart).await?;

                metrics::counter!("carts_created_total").increment(1);
                tracing::info!(cart_id = %cart.id(), "cart created");
            }
        }

        Ok(())
    }
}

#[async_trait]
impl<C, P, R> AddProductToCartUseCase for AddProductToCart<C, P, R>
where
    C: CustomerGateway,
    P: ProductGateway,
    R: CartRepository,
{
    async fn execute(&self, input: AddProductToCartInput) -> Result<(), CheckoutError> {
        AddProductToCart::execute(self, input).await
    }
}

#[cfg(test)]
mod tests {
    use domain::{DomainError, Money};

    use super::*;
    use crate::error::ErrorKind;
    use crate::ports::{
        InMemoryCartRepository, InMemoryCustomerGateway, InMemoryProductGateway, Product,
    };

    type InMemoryUseCase =
        AddProductToCart<InMemoryCustomerGateway, InMemoryProductGateway, InMemoryCartRepository>;

    async fn setup(price: i64) -> (InMemoryUseCase, CustomerId, ProductId) {
        let customers = InMemoryCustomerGateway::new();
        let products = InMemoryProductGateway::new();
        let customer_id = CustomerId::new();
        let product_id = ProductId::new();

        customers.register(customer_id).await;
        products
            .insert(Product {
                id: product_id,
                unit_price: Money::new(price).unwrap(),
            })
            .await;

        let use_case = AddProductToCart::new(customers, products, InMemoryCartRepository::new());
        (use_case, customer_id, product_id)
    }

    #[tokio::test]
    async fn test_repeated_adds_merge_into_one_line() {
        let (use_case, customer_id, product_id) = setup(1000).await;

        for quantity in [1, 2, 3] {
            use_case
                .execute(AddProductToCartInput::new(customer_id, product_id, quantity))
                .await
                .unwrap();
        }

        let cart = use_case.carts().get(customer_id).await.unwrap();
        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.total_quantity().value(), 6);
        assert_eq!(cart.total_price().cents(), 6000);
        assert_eq!(use_case.carts().create_calls().await, 1);
        assert_eq!(use_case.carts().update_calls().await, 2);
    }

    #[tokio::test]
    async fn test_zero_quantity_persists_nothing() {
        let (use_case, customer_id, product_id) = setup(1000).await;

        let err = use_case
            .execute(AddProductToCartInput::new(customer_id, product_id, 0))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CheckoutError::Domain(DomainError::QuantityBelowMinimum { quantity: 0 })
        ));
        assert_eq!(use_case.carts().create_calls().await, 0);
        assert_eq!(use_case.carts().cart_count().await, 0);
    }

    #[tokio::test]
    async fn test_negative_quantity_on_existing_cart_persists_nothing() {
        let (use_case, customer_id, product_id) = setup(1000).await;
        use_case
            .execute(AddProductToCartInput::new(customer_id, product_id, 1))
            .await
            .unwrap();

        let err = use_case
            .execute(AddProductToCartInput::new(customer_id, product_id, -5))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NegativeValue);
        assert_eq!(use_case.carts().update_calls().await, 0);
    }

    #[tokio::test]
    async fn test_customer_port_failure_is_forwarded() {
        let (use_case, customer_id, product_id) = setup(1000).await;
        use_case.customers().set_fail_on_lookup(true).await;

        let err = use_case
            .execute(AddProductToCartInput::new(customer_id, product_id, 1))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::TransportFailure);
        assert_eq!(
            err.to_string(),
            "customer directory unavailable"
        );
    }

    #[tokio::test]
    async fn test_write_failure_is_forwarded() {
        let (use_case, customer_id, product_id) = setup(1000).await;
        use_case.carts().set_fail_on_write(true).await;

        let err = use_case
            .execute(AddProductToCartInput::new(customer_id, product_id, 1))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::TransportFailure);
        assert_eq!(use_case.carts().create_calls().await, 1);
    }

    #[tokio::test]
    async fn test_callable_through_trait_object() {
        let (use_case, customer_id, product_id) = setup(250).await;
        let carts = use_case.carts().clone();
        let dynamic: Box<dyn AddProductToCartUseCase> = Box::new(use_case);

        dynamic
            .execute(AddProductToCartInput::new(customer_id, product_id, 4))
            .await
            .unwrap();

        assert_eq!(carts.get(customer_id).await.unwrap().total_price().cents(), 1000);
    }
}
