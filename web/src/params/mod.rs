pub(crate) mod product_hub;
