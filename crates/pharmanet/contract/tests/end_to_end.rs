//! End-to-end supply chain: manufacture, two hops of ordering and shipping,
//! retail to a consumer, then an audit of the unit's history.

mod common;

use common::*;
use pharmanet_contract::ErrorKind;
use pharmanet_types::{keys, HierarchyRank, Owner, ShipmentStatus};

#[tokio::test]
async fn paracetamol_travels_from_manufacturer_to_consumer() {
    let net = Network::new();
    net.register_all().await;
    net.manufacture("Paracetamol", &["S1", "S2"]).await;
    let c = &net.contract;

    let manufacturer_key = keys::company(MANUFACTURER_CRN, "Sun Pharma").unwrap();
    let distributor_key = keys::company(DISTRIBUTOR_CRN, "VG Pharma").unwrap();
    let retailer_key = keys::company(RETAILER_CRN, "upgrad").unwrap();
    let transporter_key = keys::company(TRANSPORTER_CRN, "FedEx").unwrap();

    // Manufacturer -> distributor
    let order = c
        .create_purchase_order(
            &net.distributor,
            DISTRIBUTOR_CRN,
            MANUFACTURER_CRN,
            "Paracetamol",
            1,
        )
        .await
        .unwrap();
    assert_eq!(order.buyer, distributor_key);
    assert_eq!(order.seller, manufacturer_key);

    let shipment = c
        .create_shipment(
            &net.manufacturer,
            DISTRIBUTOR_CRN,
            "Paracetamol",
            "Paracetamol|S1",
            TRANSPORTER_CRN,
        )
        .await
        .unwrap();
    assert_eq!(shipment.status, ShipmentStatus::InTransit);
    assert_eq!(shipment.creator, manufacturer_key);

    let unit = c.current_state("Paracetamol", "S1").await.unwrap();
    assert_eq!(unit.owner, Owner::Organization(transporter_key.clone()));
    assert_eq!(unit.shipments, vec![shipment.key.clone()]);

    let delivered = c
        .update_shipment(&net.transporter, DISTRIBUTOR_CRN, "Paracetamol", TRANSPORTER_CRN)
        .await
        .unwrap();
    assert_eq!(delivered.status, ShipmentStatus::Delivered);
    let unit = c.current_state("Paracetamol", "S1").await.unwrap();
    assert_eq!(unit.owner, Owner::Organization(distributor_key.clone()));
    assert_eq!(unit.shipments, vec![shipment.key.clone(), shipment.key.clone()]);

    // The unit not shipped stays with the manufacturer.
    let untouched = c.current_state("Paracetamol", "S2").await.unwrap();
    assert_eq!(untouched.owner, Owner::Organization(manufacturer_key));

    // Distributor -> retailer
    c.create_purchase_order(&net.retailer, RETAILER_CRN, DISTRIBUTOR_CRN, "Paracetamol", 1)
        .await
        .unwrap();
    c.create_shipment(
        &net.distributor,
        RETAILER_CRN,
        "Paracetamol",
        "Paracetamol|S1",
        TRANSPORTER_CRN,
    )
    .await
    .unwrap();
    c.update_shipment(&net.transporter, RETAILER_CRN, "Paracetamol", TRANSPORTER_CRN)
        .await
        .unwrap();
    let unit = c.current_state("Paracetamol", "S1").await.unwrap();
    assert_eq!(unit.owner, Owner::Organization(retailer_key));
    assert_eq!(unit.shipments.len(), 4);

    // Retail
    let sold = c
        .retail(&net.retailer, "Paracetamol", "S1", RETAILER_CRN, "AAD-1234")
        .await
        .unwrap();
    assert_eq!(sold.owner, Owner::Consumer("AAD-1234".to_string()));
    assert_eq!(sold.shipments.len(), 4);

    // History: add, ship, deliver, ship, deliver, retail.
    let versions = c
        .history("Paracetamol", "S1")
        .await
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    assert_eq!(versions.len(), 6);
    assert_eq!(versions[0].value.shipments.len(), 0);
    assert_eq!(versions[5].value.owner, Owner::Consumer("AAD-1234".to_string()));
    assert!(versions.windows(2).all(|pair| pair[0].timestamp <= pair[1].timestamp));

    let replay = c
        .history("Paracetamol", "S1")
        .await
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    assert_eq!(versions, replay);

    net.store.verify_chain().unwrap();
}

#[tokio::test]
async fn registration_assigns_hierarchy_ranks() {
    let net = Network::new();
    let c = &net.contract;
    let cases = [
        ("Manufacturer", HierarchyRank::Ranked(1)),
        ("Distributor", HierarchyRank::Ranked(2)),
        ("Retailer", HierarchyRank::Ranked(3)),
        ("Transporter", HierarchyRank::Unranked),
    ];
    for (index, (role, rank)) in cases.into_iter().enumerate() {
        let crn = format!("CRN{}", index);
        let organization = c
            .register(&net.outsider(), &crn, "Org", "Pune", role)
            .await
            .unwrap();
        assert_eq!(organization.hierarchy_rank, rank);
    }

    let err = c
        .register(&net.outsider(), "CRN9", "Org", "Pune", "Regulator")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn purchase_order_between_distributors_is_rejected() {
    let net = Network::new();
    net.register_all().await;
    net.contract
        .register(&net.distributor, "DIST002", "Other Pharma", "Kochi", "Distributor")
        .await
        .unwrap();
    net.manufacture("Paracetamol", &["S1"]).await;

    let err = net
        .contract
        .create_purchase_order(&net.distributor, "DIST002", DISTRIBUTOR_CRN, "Paracetamol", 1)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(err.to_string().contains("hierarchical manner"));
}

#[tokio::test]
async fn shipment_with_short_asset_list_is_rejected() {
    let net = Network::new();
    net.register_all().await;
    net.manufacture("Paracetamol", &["S1", "S2"]).await;
    let c = &net.contract;

    c.create_purchase_order(&net.distributor, DISTRIBUTOR_CRN, MANUFACTURER_CRN, "Paracetamol", 2)
        .await
        .unwrap();
    let committed = net.store.transaction_log().unwrap().len();

    let err = c
        .create_shipment(
            &net.manufacturer,
            DISTRIBUTOR_CRN,
            "Paracetamol",
            "Paracetamol|S1",
            TRANSPORTER_CRN,
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    // Nothing was written: S1 still belongs to the manufacturer.
    assert_eq!(net.store.transaction_log().unwrap().len(), committed);
    let unit = c.current_state("Paracetamol", "S1").await.unwrap();
    assert!(unit.shipments.is_empty());
}

#[tokio::test]
async fn shipment_of_several_units_moves_them_together() {
    let net = Network::new();
    net.register_all().await;
    net.manufacture("Paracetamol", &["S1", "S2", "S3"]).await;
    let c = &net.contract;

    c.create_purchase_order(&net.distributor, DISTRIBUTOR_CRN, MANUFACTURER_CRN, "Paracetamol", 2)
        .await
        .unwrap();
    let shipment = c
        .create_shipment(
            &net.manufacturer,
            DISTRIBUTOR_CRN,
            "Paracetamol",
            " Paracetamol|S3 , Paracetamol|S1 ",
            TRANSPORTER_CRN,
        )
        .await
        .unwrap();
    assert_eq!(
        shipment.assets,
        vec![
            keys::drug("Paracetamol", "S3").unwrap(),
            keys::drug("Paracetamol", "S1").unwrap(),
        ]
    );

    c.update_shipment(&net.transporter, DISTRIBUTOR_CRN, "Paracetamol", TRANSPORTER_CRN)
        .await
        .unwrap();
    let distributor_key = keys::company(DISTRIBUTOR_CRN, "VG Pharma").unwrap();
    for serial in ["S1", "S3"] {
        let unit = c.current_state("Paracetamol", serial).await.unwrap();
        assert!(unit.is_owned_by(&distributor_key));
        assert_eq!(unit.shipments.len(), 2);
    }
    let left = c.current_state("Paracetamol", "S2").await.unwrap();
    assert!(!left.is_owned_by(&distributor_key));
}
