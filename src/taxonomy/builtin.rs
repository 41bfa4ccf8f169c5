// 🏦 Built-in Taxonomy - Vanguard fund model
// Used when no external taxonomy source is configured.

use crate::taxonomy::node::CategoryNode;

const ROOT_ID: &str = "984ce69d-de79-478b-9223-ff6349514e19";
const INDEX_FUNDS_ID: &str = "5ec6957d-4de7-4199-9373-d4a7fb59d6e1";

const INDEX_FUND_TICKERS: &str = "vbiix|vbinx|vbisx|vbltx|vbmfx|vdaix|vdvix|veiex|veurx|vexmx|vfinx|vfsvx|vftsx|vfwix|vgovx|vgtsx|vhdyx|viaix|vigrx|vihix|vimsx|visgx|visvx|vivax|vlacx|vmgix|vmvix|vpacx|vtebx|vtibx|vtipx|vtsax|vtsmx|vtws";

/// Root "Vanguard" with a single "Index Funds" category.
pub fn vanguard() -> CategoryNode {
    CategoryNode::new("Vanguard").with_id(ROOT_ID).with_child(
        CategoryNode::new("Index Funds")
            .with_id(INDEX_FUNDS_ID)
            .with_details(INDEX_FUND_TICKERS),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vanguard_shape() {
        let root = vanguard();
        assert_eq!(root.name(), "Vanguard");
        assert!(root.triggers().is_empty());
        assert_eq!(root.children().len(), 1);

        let index = &root.children()[0];
        assert_eq!(index.name(), "Index Funds");
        assert_eq!(index.triggers().len(), 34);
        assert!(index.has_trigger("vfinx"));
        assert!(index.has_trigger("vtws"));
    }
}
