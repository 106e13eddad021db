//! GraphQL documents issued against the Admin API.
//!
//! Kept as plain documents (sent as `{ query, variables }`) so the one
//! client code path serves every operation.

/// Create a product, optionally with its option axes declared via
/// `productOptions` in the input.
pub const PRODUCT_CREATE: &str = r"
  mutation productCreate($input: ProductInput!) {
    productCreate(input: $input) {
      product {
        id
        title
        handle
        status
        options {
          id
          name
          values
        }
        variants(first: 100) {
          edges {
            node {
              id
              title
              price
              compareAtPrice
              sku
              inventoryQuantity
              selectedOptions {
                name
                value
              }
            }
          }
        }
      }
      userErrors {
        field
        message
      }
    }
  }
";

/// Update core product fields.
pub const PRODUCT_UPDATE: &str = r"
  mutation productUpdate($input: ProductInput!) {
    productUpdate(input: $input) {
      product {
        id
        title
        handle
      }
      userErrors {
        field
        message
      }
    }
  }
";

/// Delete a product.
pub const PRODUCT_DELETE: &str = r"
  mutation productDelete($input: ProductDeleteInput!) {
    productDelete(input: $input) {
      deletedProductId
      userErrors {
        field
        message
      }
    }
  }
";

/// Full product fetch: options, variants, media, landing metafields.
pub const PRODUCT_FULL: &str = r"
  query getProductFull($id: ID!) {
    product(id: $id) {
      id
      title
      handle
      status
      descriptionHtml
      vendor
      productType
      templateSuffix
      options {
        id
        name
        values
      }
      variants(first: 100) {
        edges {
          node {
            id
            title
            price
            compareAtPrice
            sku
            inventoryQuantity
            selectedOptions {
              name
              value
            }
          }
        }
      }
      media(first: 50) {
        edges {
          node {
            ... on MediaImage {
              id
              status
              image {
                url
                altText
              }
            }
          }
        }
      }
      metafields(first: 100) {
        edges {
          node {
            id
            namespace
            key
            value
            type
          }
        }
      }
    }
  }
";

/// Paginated product listing for the dashboard.
pub const PRODUCTS_LIST: &str = r"
  query getProducts($first: Int!, $query: String) {
    products(first: $first, query: $query) {
      edges {
        node {
          id
          title
          handle
          status
          templateSuffix
          featuredImage {
            url
          }
          variants(first: 1) {
            edges {
              node {
                id
                price
                sku
              }
            }
          }
        }
      }
      pageInfo {
        hasNextPage
        endCursor
      }
    }
  }
";

/// Write landing-page content metafields onto a product.
pub const METAFIELDS_SET: &str = r"
  mutation metafieldsSet($metafields: [MetafieldsSetInput!]!) {
    metafieldsSet(metafields: $metafields) {
      metafields {
        id
        namespace
        key
        value
      }
      userErrors {
        field
        message
      }
    }
  }
";

/// List sales channels (publications) for the publish loop.
pub const GET_PUBLICATIONS: &str = r"
  query getPublications {
    publications(first: 10) {
      edges {
        node {
          id
          name
        }
      }
    }
  }
";

/// Publish a product to one sales channel.
pub const PUBLISH_PRODUCT: &str = r"
  mutation publishablePublish($id: ID!, $input: [PublicationInput!]!) {
    publishablePublish(id: $id, input: $input) {
      publishable {
        availablePublicationsCount {
          count
        }
      }
      userErrors {
        field
        message
      }
    }
  }
";

/// Remove a product from one sales channel.
pub const UNPUBLISH_PRODUCT: &str = r"
  mutation publishableUnpublish($id: ID!, $input: [PublicationInput!]!) {
    publishableUnpublish(id: $id, input: $input) {
      publishable {
        availablePublicationsCount {
          count
        }
      }
      userErrors {
        field
        message
      }
    }
  }
";

/// Reserve staged upload targets for direct-to-storage image uploads.
pub const STAGED_UPLOADS_CREATE: &str = r"
  mutation stagedUploadsCreate($input: [StagedUploadInput!]!) {
    stagedUploadsCreate(input: $input) {
      stagedTargets {
        url
        resourceUrl
        parameters {
          name
          value
        }
      }
      userErrors {
        field
        message
      }
    }
  }
";

/// Register an uploaded staged resource as a shop file.
pub const FILE_CREATE: &str = r"
  mutation fileCreate($files: [FileCreateInput!]!) {
    fileCreate(files: $files) {
      files {
        id
        fileStatus
        preview {
          image {
            url
          }
        }
      }
      userErrors {
        field
        message
      }
    }
  }
";

/// Attach uploaded or external images to a product as media.
pub const PRODUCT_CREATE_MEDIA: &str = r"
  mutation productCreateMedia($productId: ID!, $media: [CreateMediaInput!]!) {
    productCreateMedia(productId: $productId, media: $media) {
      media {
        ... on MediaImage {
          id
          status
          image {
            url
            altText
          }
        }
      }
      mediaUserErrors {
        field
        message
      }
      product {
        id
      }
    }
  }
";

/// Bulk-create variants from the expanded combinations.
pub const PRODUCT_VARIANTS_BULK_CREATE: &str = r"
  mutation productVariantsBulkCreate($productId: ID!, $variants: [ProductVariantsBulkInput!]!) {
    productVariantsBulkCreate(productId: $productId, variants: $variants) {
      productVariants {
        id
        title
        price
        compareAtPrice
        sku
        inventoryQuantity
        selectedOptions {
          name
          value
        }
      }
      userErrors {
        field
        message
      }
    }
  }
";

/// Bulk-update existing variants (price/SKU edits on update).
pub const PRODUCT_VARIANTS_BULK_UPDATE: &str = r"
  mutation productVariantsBulkUpdate($productId: ID!, $variants: [ProductVariantsBulkInput!]!) {
    productVariantsBulkUpdate(productId: $productId, variants: $variants) {
      productVariants {
        id
        title
        price
        compareAtPrice
        sku
      }
      userErrors {
        field
        message
      }
    }
  }
";

/// First inventory location, needed when supplying initial quantities.
pub const PRIMARY_LOCATION: &str = r"
  query primaryLocation {
    locations(first: 1) {
      edges {
        node {
          id
          name
        }
      }
    }
  }
";

/// Cheap connectivity probe used by the CLI.
pub const SHOP_NAME: &str = r"
  query shopName {
    shop {
      name
      myshopifyDomain
    }
  }
";
