use crate::product::Product;
use crate::session::ProductEvent;

/// Local, insertion-ordered copy of the server's product list.
#[derive(Debug, Default, Clone)]
pub struct ProductMirror {
    products: Vec<Product>,
}

impl ProductMirror {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the mirror with a fresh snapshot, as fetched once at startup.
    pub fn load(&mut self, products: Vec<Product>) {
        self.products = products;
    }

    pub fn apply(&mut self, event: &ProductEvent) {
        match event {
            ProductEvent::Added(product) => self.products.push(product.clone()),
            ProductEvent::Updated(product) => {
                // Updates for ids this mirror has never seen are ignored
                if let Some(existing) = self.products.iter_mut().find(|p| p.id == product.id) {
                    *existing = product.clone();
                }
            }
            ProductEvent::Deleted(id) => self.products.retain(|p| p.id != *id),
        }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn find(&self, id: i32) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: i32, name: &str) -> Product {
        Product {
            id,
            ..Product::draft(name, 1.0, "")
        }
    }

    #[test]
    fn applying_events_reproduces_the_server_list() {
        let mut mirror = ProductMirror::new();

        mirror.apply(&ProductEvent::Added(product(1, "Widget")));
        mirror.apply(&ProductEvent::Added(product(2, "Widget")));
        mirror.apply(&ProductEvent::Deleted(1));
        mirror.apply(&ProductEvent::Added(product(3, "Gadget")));
        mirror.apply(&ProductEvent::Updated(product(2, "Gizmo")));

        let names: Vec<(i32, &str)> = mirror
            .products()
            .iter()
            .map(|p| (p.id, p.name.as_str()))
            .collect();
        assert_eq!(names, vec![(2, "Gizmo"), (3, "Gadget")]);
    }

    #[test]
    fn update_for_unknown_id_is_a_no_op() {
        let mut mirror = ProductMirror::new();
        mirror.load(vec![product(1, "Widget")]);

        mirror.apply(&ProductEvent::Updated(product(9, "Ghost")));

        assert_eq!(mirror.products(), &[product(1, "Widget")]);
    }

    #[test]
    fn delete_removes_every_entry_with_the_id() {
        let mut mirror = ProductMirror::new();
        mirror.load(vec![product(1, "A"), product(2, "B"), product(1, "A again")]);

        mirror.apply(&ProductEvent::Deleted(1));

        assert_eq!(mirror.len(), 1);
        assert!(mirror.find(1).is_none());
        assert_eq!(mirror.find(2).map(|p| p.name.as_str()), Some("B"));
    }

    #[test]
    fn deleting_an_unknown_id_leaves_the_mirror_unchanged() {
        let mut mirror = ProductMirror::new();
        mirror.load(vec![product(1, "A")]);

        mirror.apply(&ProductEvent::Deleted(5));

        assert_eq!(mirror.len(), 1);
    }
}
