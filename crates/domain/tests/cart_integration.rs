//! Integration tests for the Cart aggregate.
//!
//! These tests exercise the public domain API the way the checkout use case
//! and the persistence adapters drive it.

use domain::{
    Cart, CartItem, CartItemId, CustomerId, DomainError, Money, ProductId, Quantity,
};

fn cart_with(items: &[(ProductId, i32, i64)]) -> Cart {
    let mut cart = Cart::new(CustomerId::new());
    for &(product_id, quantity, price) in items {
        cart.add_item(product_id, quantity, price).unwrap();
    }
    cart
}

mod merging {
    use super::*;

    #[test]
    fn repeated_products_collapse_into_one_line() {
        let product1 = ProductId::new();
        let product2 = ProductId::new();
        let product3 = ProductId::new();

        let cart = cart_with(&[
            (product1, 2, 32000),
            (product2, 5, 17340),
            (product2, 1, 17340),
            (product2, 4, 17340),
            (product3, 9, 1550),
        ]);

        assert_eq!(cart.item_count(), 3);
        assert_eq!(cart.total_quantity().value(), 21);
        assert_eq!(cart.total_price().cents(), 251350);
        assert_eq!(cart.item(product2).unwrap().quantity().value(), 10);
    }

    #[test]
    fn merged_quantity_is_sum_of_calls() {
        for (first, second) in [(1, 1), (2, 5), (7, 3), (100, 1)] {
            let product = ProductId::new();
            let cart = cart_with(&[(product, first, 10), (product, second, 10)]);

            assert_eq!(cart.item_count(), 1);
            assert_eq!(
                cart.item(product).unwrap().quantity().value(),
                (first + second) as u32
            );
        }
    }

    #[test]
    fn merging_keeps_line_identity() {
        let product = ProductId::new();
        let mut cart = cart_with(&[(product, 1, 500)]);
        let line_id = cart.item(product).unwrap().id();

        cart.add_item(product, 4, 500).unwrap();

        assert_eq!(cart.item(product).unwrap().id(), line_id);
    }
}

mod removal {
    use super::*;

    #[test]
    fn removing_one_of_several_products_updates_totals() {
        let product1 = ProductId::new();
        let product2 = ProductId::new();
        let product3 = ProductId::new();
        let mut cart = cart_with(&[
            (product1, 2, 32000),
            (product2, 5, 17340),
            (product2, 1, 17340),
            (product2, 4, 17340),
            (product3, 9, 1550),
        ]);

        cart.remove_item(product2).unwrap();

        assert_eq!(cart.item_count(), 2);
        assert_eq!(cart.total_quantity().value(), 11);
        assert_eq!(cart.total_price().cents(), 64000 + 13950);
        assert!(cart.item(product2).is_none());
    }

    #[test]
    fn removing_twice_reports_empty_cart() {
        let product = ProductId::new();
        let mut cart = cart_with(&[(product, 1, 100)]);

        cart.remove_item(product).unwrap();

        assert_eq!(cart.remove_item(product), Err(DomainError::CartEmpty));
    }

    #[test]
    fn removing_unknown_product_is_rejected() {
        let mut cart = cart_with(&[(ProductId::new(), 1, 100)]);
        let unknown = ProductId::new();

        assert_eq!(
            cart.remove_item(unknown),
            Err(DomainError::ProductNotInCart {
                product_id: unknown
            })
        );
    }
}

mod reconstitution {
    use super::*;

    #[test]
    fn restored_cart_behaves_like_original() {
        let product = ProductId::new();
        let item = CartItem::restore(
            CartItemId::new(),
            product,
            Quantity::from(2),
            Money::new(2550).unwrap(),
        );
        let customer_id = CustomerId::new();
        let mut cart = Cart::restore(domain::CartId::new(), customer_id, vec![item]);

        cart.add_item(product, 3, 9999).unwrap();

        assert_eq!(cart.customer_id(), customer_id);
        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.total_price().cents(), 5 * 2550);
    }

    #[test]
    fn cart_serialization_roundtrip() {
        let cart = cart_with(&[(ProductId::new(), 3, 3550), (ProductId::new(), 1, 10)]);

        let json = serde_json::to_string(&cart).unwrap();
        let deserialized: Cart = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized, cart);
        assert_eq!(deserialized.total_price().cents(), 10660);
    }
}
